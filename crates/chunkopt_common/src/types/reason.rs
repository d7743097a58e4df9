use arcstr::ArcStr;
use chunkopt_utils::indexmap::FxIndexSet;

use crate::{ChunkIdx, ModuleIdx};

/// Why a module is part of the graph: `module` depends on it through `dependency`.
#[derive(Debug, Clone)]
pub struct Reason {
  pub module: Option<ModuleIdx>,
  pub dependency: ArcStr,
  /// Explicit subset of chunks this reason applies to. `None` means every chunk of `module`.
  pub chunks: Option<FxIndexSet<ChunkIdx>>,
}

impl Reason {
  pub fn new(module: Option<ModuleIdx>, dependency: ArcStr) -> Self {
    Self { module, dependency, chunks: None }
  }

  pub fn is_from(&self, module: Option<ModuleIdx>, dependency: &str) -> bool {
    self.module == module && self.dependency == dependency
  }
}
