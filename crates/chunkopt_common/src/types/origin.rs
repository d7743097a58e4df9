use arcstr::ArcStr;

use crate::{ModuleIdx, SourceLocation};

/// Provenance of a chunk. `reasons` lists the most recent merge first.
#[derive(Debug, Clone, Default)]
pub struct Origin {
  pub module: Option<ModuleIdx>,
  pub loc: Option<SourceLocation>,
  pub name: Option<ArcStr>,
  pub reasons: Vec<ArcStr>,
}

impl Origin {
  pub fn new(module: Option<ModuleIdx>, loc: Option<SourceLocation>, name: Option<ArcStr>) -> Self {
    Self { module, loc, name, reasons: Vec::new() }
  }

  /// Records `reason` as the latest provenance unless it already is.
  pub fn push_front_reason(&mut self, reason: &ArcStr) {
    if self.reasons.first() != Some(reason) {
      self.reasons.insert(0, reason.clone());
    }
  }
}

#[test]
fn test_push_front_reason() {
  let mut origin = Origin::default();
  origin.push_front_reason(&arcstr::literal!("limit"));
  origin.push_front_reason(&arcstr::literal!("limit"));
  origin.push_front_reason(&arcstr::literal!("min-size"));
  assert_eq!(origin.reasons, vec!["min-size", "limit"]);
}
