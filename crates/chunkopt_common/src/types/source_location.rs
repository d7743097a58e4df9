use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A position in a module's source. Ordered by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
  pub line: u32,
  pub column: u32,
}

impl SourceLocation {
  pub fn new(line: u32, column: u32) -> Self {
    Self { line, column }
  }
}

impl Display for SourceLocation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

#[test]
fn test_source_location_order() {
  let mut locs = vec![SourceLocation::new(3, 1), SourceLocation::new(1, 9), SourceLocation::new(1, 2)];
  locs.sort();
  assert_eq!(locs, vec![SourceLocation::new(1, 2), SourceLocation::new(1, 9), SourceLocation::new(3, 1)]);
  assert_eq!(locs[0].to_string(), "1:2");
}
