use arcstr::ArcStr;

use crate::{ChunkIdx, ModuleIdx, SourceLocation};

/// A split point, e.g. a dynamic import. `chunks` becomes `None` once every chunk implementing
/// it has been removed, and `chunk_reason` then tells why.
#[derive(Debug, Clone, Default)]
pub struct Block {
  pub name: Option<ArcStr>,
  pub module: Option<ModuleIdx>,
  pub loc: Option<SourceLocation>,
  pub chunks: Option<Vec<ChunkIdx>>,
  pub chunk_reason: Option<ArcStr>,
}

impl Block {
  pub fn new(name: Option<ArcStr>, module: Option<ModuleIdx>, loc: Option<SourceLocation>) -> Self {
    Self { name, module, loc, chunks: Some(Vec::new()), chunk_reason: None }
  }
}
