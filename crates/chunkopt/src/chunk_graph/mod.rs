mod check_constraints;
mod connect;
mod integrate;
mod reasons;
mod remove;
mod size;
mod sort_items;

use arcstr::ArcStr;
use chunkopt_common::{
  Block, BlockIdx, Chunk, ChunkIdx, ChunkTable, Entrypoint, EntrypointIdx, Module, ModuleIdx,
  ModuleKind, ModuleTable, SourceLocation,
};
use oxc_index::IndexVec;

const FIRST_DEBUG_ID: u32 = 1000;

/// Owns every module, chunk, block and entrypoint of a build session.
///
/// Entities refer to each other by index. Every relation is stored on both ends and must only be
/// changed through the methods of this type, which keep both ends in sync.
#[derive(Debug)]
pub struct ChunkGraph {
  pub module_table: ModuleTable,
  pub chunk_table: ChunkTable,
  pub blocks: IndexVec<BlockIdx, Block>,
  pub entrypoints: IndexVec<EntrypointIdx, Entrypoint>,
  /// Chunks that end up in the output, in output order.
  pub chunks: Vec<ChunkIdx>,
  /// Chunks extracted into a separate output, e.g. stylesheets.
  pub extracted_chunks: Vec<ChunkIdx>,
  /// Every module, in id assignment order.
  pub sorted_modules: Vec<ModuleIdx>,
  next_module_debug_id: u32,
  next_chunk_debug_id: u32,
}

impl ChunkGraph {
  pub fn new() -> Self {
    Self {
      module_table: ModuleTable::default(),
      chunk_table: ChunkTable::default(),
      blocks: IndexVec::default(),
      entrypoints: IndexVec::default(),
      chunks: Vec::new(),
      extracted_chunks: Vec::new(),
      sorted_modules: Vec::new(),
      next_module_debug_id: FIRST_DEBUG_ID,
      next_chunk_debug_id: FIRST_DEBUG_ID,
    }
  }

  pub fn add_module(&mut self, kind: impl Into<ModuleKind>) -> ModuleIdx {
    let debug_id = self.next_module_debug_id;
    self.next_module_debug_id += 1;
    let idx = self.module_table.next_idx();
    self.module_table.push(Module::new(idx, debug_id, kind.into()));
    self.sorted_modules.push(idx);
    idx
  }

  /// Creates a chunk without putting it into any chunk list.
  pub fn create_chunk(&mut self, name: Option<ArcStr>) -> ChunkIdx {
    let debug_id = self.next_chunk_debug_id;
    self.next_chunk_debug_id += 1;
    let idx = self.chunk_table.next_idx();
    self.chunk_table.push(Chunk::new(idx, debug_id, name))
  }

  /// Returns the chunk of `chunks` named `name`, or creates one and appends it to `chunks`.
  pub fn find_or_create_chunk(
    &mut self,
    chunks: &mut Vec<ChunkIdx>,
    name: Option<&ArcStr>,
  ) -> ChunkIdx {
    if let Some(name) = name {
      if let Some(existing) =
        chunks.iter().copied().find(|chunk| self.chunk_table[*chunk].name.as_ref() == Some(name))
      {
        return existing;
      }
    }
    let chunk = self.create_chunk(name.cloned());
    chunks.push(chunk);
    chunk
  }

  pub fn create_block(
    &mut self,
    name: Option<ArcStr>,
    module: Option<ModuleIdx>,
    loc: Option<SourceLocation>,
  ) -> BlockIdx {
    self.blocks.push(Block::new(name, module, loc))
  }

  pub fn create_entrypoint(&mut self, name: ArcStr) -> EntrypointIdx {
    self.entrypoints.push(Entrypoint::new(name))
  }

  pub fn has_runtime(&self, chunk: ChunkIdx) -> bool {
    self.chunk_table[chunk].has_runtime(&self.entrypoints)
  }

  pub fn identifier(&self, module: ModuleIdx) -> &str {
    self.module_table[module].identifier()
  }

  /// `Chunk[<module>,...]`, for diagnostics.
  pub fn describe_chunk(&self, chunk: ChunkIdx) -> String {
    let modules = self.chunk_table[chunk]
      .modules
      .iter()
      .map(|module| self.module_table[*module].to_string())
      .collect::<Vec<_>>();
    format!("Chunk[{}]", modules.join(","))
  }
}

impl Default for ChunkGraph {
  fn default() -> Self {
    Self::new()
  }
}

pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
  if items.contains(&item) {
    return false;
  }
  items.push(item);
  true
}

pub(crate) fn remove_item<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
  if let Some(idx) = items.iter().position(|i| i == item) {
    items.remove(idx);
    true
  } else {
    false
  }
}

#[cfg(test)]
pub(crate) mod test_utils {
  use arcstr::ArcStr;
  use chunkopt_common::{ChunkIdx, ModuleIdx, NormalModule};

  use super::ChunkGraph;

  pub fn module(graph: &mut ChunkGraph, identifier: &str, size: u64) -> ModuleIdx {
    let request = ArcStr::from(identifier);
    graph.add_module(NormalModule::new(request.clone(), request, size))
  }

  /// A listed chunk holding `modules`.
  pub fn chunk(graph: &mut ChunkGraph, name: &str, modules: &[ModuleIdx]) -> ChunkIdx {
    let chunk = graph.create_chunk(Some(name.into()));
    graph.chunks.push(chunk);
    for module in modules {
      graph.add_module_to_chunk(chunk, *module);
    }
    chunk
  }

  /// A listed chunk that is the runtime chunk of an entrypoint of the same name.
  pub fn entry_chunk(graph: &mut ChunkGraph, name: &str, modules: &[ModuleIdx]) -> ChunkIdx {
    let chunk = chunk(graph, name, modules);
    let entrypoint = graph.create_entrypoint(name.into());
    graph.add_chunk_to_entrypoint(entrypoint, chunk);
    if let Some(first) = modules.first() {
      graph.chunk_table[chunk].entry_module = Some(*first);
    }
    chunk
  }

  pub fn names(graph: &ChunkGraph, chunks: &[ChunkIdx]) -> Vec<String> {
    chunks
      .iter()
      .map(|chunk| graph.chunk_table[*chunk].name.as_deref().unwrap_or("").to_string())
      .collect()
  }
}

#[test]
fn test_debug_ids_are_never_reused() {
  let mut graph = ChunkGraph::new();
  let a = graph.create_chunk(None);
  let b = graph.create_chunk(None);
  assert_eq!(graph.chunk_table[a].debug_id, 1000);
  assert_eq!(graph.chunk_table[b].debug_id, 1001);
  graph.remove_chunk(a, &arcstr::literal!("empty"));
  let c = graph.create_chunk(None);
  assert_eq!(graph.chunk_table[c].debug_id, 1002);
}

#[test]
fn test_find_or_create_chunk() {
  let mut graph = ChunkGraph::new();
  let mut chunks = Vec::new();
  let vendor = graph.find_or_create_chunk(&mut chunks, Some(&arcstr::literal!("vendor")));
  assert_eq!(graph.find_or_create_chunk(&mut chunks, Some(&arcstr::literal!("vendor"))), vendor);
  let anonymous = graph.find_or_create_chunk(&mut chunks, None);
  assert_ne!(anonymous, vendor);
  assert_eq!(chunks, vec![vendor, anonymous]);
}
