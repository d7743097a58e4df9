pub mod chunk_table;

use arcstr::ArcStr;
use chunkopt_utils::indexmap::FxIndexSet;
use oxc_index::IndexVec;

use crate::{BlockIdx, ChunkIdx, Entrypoint, EntrypointIdx, ModuleIdx, Origin, SourceLocation};

/// An output unit. Adjacency is kept in insertion order and only changed through `ChunkGraph`,
/// which keeps both directions of every relation in sync.
#[derive(Debug)]
pub struct Chunk {
  pub idx: ChunkIdx,
  /// Assigned after chunk ordering.
  pub id: Option<u32>,
  pub name: Option<ArcStr>,
  /// Diagnostic only, never reused within a graph.
  pub debug_id: u32,
  pub modules: Vec<ModuleIdx>,
  pub parents: Vec<ChunkIdx>,
  pub children: Vec<ChunkIdx>,
  pub blocks: FxIndexSet<BlockIdx>,
  pub origins: Vec<Origin>,
  pub entrypoints: Vec<EntrypointIdx>,
  pub entry_module: Option<ModuleIdx>,
  pub filename_template: Option<ArcStr>,
  pub chunk_reason: Option<ArcStr>,
  // Created by async commons extraction
  pub extra_async: bool,
  pub rendered: bool,
}

impl Chunk {
  pub fn new(idx: ChunkIdx, debug_id: u32, name: Option<ArcStr>) -> Self {
    Self {
      idx,
      id: None,
      name,
      debug_id,
      modules: Vec::new(),
      parents: Vec::new(),
      children: Vec::new(),
      blocks: FxIndexSet::default(),
      origins: Vec::new(),
      entrypoints: Vec::new(),
      entry_module: None,
      filename_template: None,
      chunk_reason: None,
      extra_async: false,
      rendered: false,
    }
  }

  pub fn is_initial(&self) -> bool {
    !self.entrypoints.is_empty()
  }

  pub fn has_entry_module(&self) -> bool {
    self.entry_module.is_some()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn has_runtime(&self, entrypoints: &IndexVec<EntrypointIdx, Entrypoint>) -> bool {
    self
      .entrypoints
      .first()
      .is_some_and(|entrypoint| entrypoints[*entrypoint].runtime_chunk() == Some(self.idx))
  }

  pub fn has_module(&self, module: ModuleIdx) -> bool {
    self.modules.contains(&module)
  }

  pub fn add_block(&mut self, block: BlockIdx) -> bool {
    self.blocks.insert(block)
  }

  pub fn add_origin(&mut self, module: Option<ModuleIdx>, loc: Option<SourceLocation>) {
    self.origins.push(Origin::new(module, loc, self.name.clone()));
  }
}

#[test]
fn test_has_runtime() {
  let mut entrypoints = IndexVec::<EntrypointIdx, Entrypoint>::default();
  let main = entrypoints.push(Entrypoint::new(arcstr::literal!("main")));

  let mut runtime = Chunk::new(ChunkIdx::from_raw(0), 1000, Some(arcstr::literal!("main")));
  let mut vendor = Chunk::new(ChunkIdx::from_raw(1), 1001, Some(arcstr::literal!("vendor")));
  let lazy = Chunk::new(ChunkIdx::from_raw(2), 1002, None);
  entrypoints[main].chunks = vec![runtime.idx, vendor.idx];
  runtime.entrypoints.push(main);
  vendor.entrypoints.push(main);

  assert!(runtime.has_runtime(&entrypoints));
  assert!(!vendor.has_runtime(&entrypoints));
  assert!(vendor.is_initial());
  assert!(!lazy.has_runtime(&entrypoints));
  assert!(!lazy.is_initial());
  assert!(lazy.is_empty());
}
