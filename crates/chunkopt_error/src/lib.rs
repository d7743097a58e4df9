mod constraint_violation;

use std::ops::{Deref, DerefMut};

pub use crate::constraint_violation::ConstraintViolation;

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<ConstraintViolation> for BuildError {
  fn from(violation: ConstraintViolation) -> Self {
    Self(vec![violation.into()])
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, error) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{error}")?;
    }
    Ok(())
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn test_build_error_from_violation() {
  let error = BuildError::from(ConstraintViolation::SelfReference { chunk: 1000 });
  assert_eq!(error.len(), 1);
  assert_eq!(error.to_string(), "checkConstraints: chunk 1000 references itself");
}
