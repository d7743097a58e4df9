use chunkopt_common::{BlockIdx, ChunkIdx, EntrypointIdx, ModuleIdx};
use chunkopt_error::ConstraintViolation;

use super::{ChunkGraph, push_unique, remove_item};

impl ChunkGraph {
  /// Returns `false` if the module already was in the chunk.
  pub fn add_module_to_chunk(&mut self, chunk: ChunkIdx, module: ModuleIdx) -> bool {
    push_unique(&mut self.module_table[module].chunks, chunk);
    push_unique(&mut self.chunk_table[chunk].modules, module)
  }

  /// Returns `false` if the module wasn't in the chunk.
  pub fn remove_module_from_chunk(&mut self, chunk: ChunkIdx, module: ModuleIdx) -> bool {
    let removed = remove_item(&mut self.module_table[module].chunks, &chunk);
    remove_item(&mut self.chunk_table[chunk].modules, &module) || removed
  }

  /// Makes `child` a child of `parent`. Returns `false` if it already was one or if both are the
  /// same chunk.
  pub fn connect_chunks(&mut self, parent: ChunkIdx, child: ChunkIdx) -> bool {
    let added = self.add_child(parent, child);
    self.add_parent(child, parent) || added
  }

  /// Drops the edge between `parent` and `child` on both ends.
  pub fn disconnect_chunks(&mut self, parent: ChunkIdx, child: ChunkIdx) -> bool {
    let removed = remove_item(&mut self.chunk_table[parent].children, &child);
    remove_item(&mut self.chunk_table[child].parents, &parent) || removed
  }

  /// One end of the parent/child relation; callers add the other end.
  pub(super) fn add_child(&mut self, chunk: ChunkIdx, child: ChunkIdx) -> bool {
    chunk != child && push_unique(&mut self.chunk_table[chunk].children, child)
  }

  pub(super) fn add_parent(&mut self, chunk: ChunkIdx, parent: ChunkIdx) -> bool {
    chunk != parent && push_unique(&mut self.chunk_table[chunk].parents, parent)
  }

  /// Lets `chunk` implement `block`, appended after the block's current chunks.
  pub fn connect_block(&mut self, chunk: ChunkIdx, block: BlockIdx) -> bool {
    let chunks = self.blocks[block].chunks.get_or_insert_with(Vec::new);
    push_unique(chunks, chunk);
    self.chunk_table[chunk].add_block(block)
  }

  /// Like `connect_block`, but `chunk` becomes the first chunk loaded for the block.
  pub(crate) fn prepend_block_chunk(&mut self, chunk: ChunkIdx, block: BlockIdx) {
    let chunks = self.blocks[block].chunks.get_or_insert_with(Vec::new);
    if !chunks.contains(&chunk) {
      chunks.insert(0, chunk);
    }
    self.chunk_table[chunk].add_block(block);
  }

  /// Appends `chunk` to the load sequence of `entrypoint`.
  pub fn add_chunk_to_entrypoint(&mut self, entrypoint: EntrypointIdx, chunk: ChunkIdx) {
    push_unique(&mut self.entrypoints[entrypoint].chunks, chunk);
    push_unique(&mut self.chunk_table[chunk].entrypoints, entrypoint);
  }

  /// Loads `chunk` right before `before` in `entrypoint`.
  pub fn insert_chunk_into_entrypoint(
    &mut self,
    entrypoint: EntrypointIdx,
    chunk: ChunkIdx,
    before: ChunkIdx,
  ) -> Result<(), ConstraintViolation> {
    match self.entrypoints[entrypoint].insert_chunk(chunk, before) {
      Some(true) => {
        push_unique(&mut self.chunk_table[chunk].entrypoints, entrypoint);
        Ok(())
      }
      Some(false) => Ok(()),
      None => Err(ConstraintViolation::EntrypointMissingChunk {
        entrypoint: self.entrypoints[entrypoint].name.to_string(),
        before: self.chunk_table[before].debug_id,
      }),
    }
  }
}

#[test]
fn test_connect_is_idempotent_and_refuses_self() {
  let mut graph = ChunkGraph::new();
  let a = graph.create_chunk(None);
  let b = graph.create_chunk(None);

  assert!(graph.connect_chunks(a, b));
  assert!(!graph.connect_chunks(a, b));
  assert!(!graph.connect_chunks(a, a));
  assert_eq!(graph.chunk_table[a].children, vec![b]);
  assert_eq!(graph.chunk_table[b].parents, vec![a]);
  assert!(graph.chunk_table[a].parents.is_empty());

  assert!(graph.disconnect_chunks(a, b));
  assert!(!graph.disconnect_chunks(a, b));
  assert!(graph.chunk_table[a].children.is_empty());
  assert!(graph.chunk_table[b].parents.is_empty());
  graph.check_constraints().unwrap();
}

#[test]
fn test_module_membership_is_bidirectional() {
  let mut graph = ChunkGraph::new();
  let module = super::test_utils::module(&mut graph, "./a.js", 10);
  let chunk = graph.create_chunk(None);

  assert!(graph.add_module_to_chunk(chunk, module));
  assert!(!graph.add_module_to_chunk(chunk, module));
  assert_eq!(graph.module_table[module].chunks, vec![chunk]);

  assert!(graph.remove_module_from_chunk(chunk, module));
  assert!(!graph.remove_module_from_chunk(chunk, module));
  assert!(graph.module_table[module].chunks.is_empty());
  assert!(graph.chunk_table[chunk].is_empty());
}

#[test]
fn test_insert_chunk_into_entrypoint() {
  let mut graph = ChunkGraph::new();
  let main = graph.create_chunk(None);
  let vendor = graph.create_chunk(None);
  let stray = graph.create_chunk(None);
  let entrypoint = graph.create_entrypoint(arcstr::literal!("main"));
  graph.add_chunk_to_entrypoint(entrypoint, main);

  graph.insert_chunk_into_entrypoint(entrypoint, vendor, main).unwrap();
  assert_eq!(graph.entrypoints[entrypoint].chunks, vec![vendor, main]);
  assert!(graph.has_runtime(vendor));
  assert!(!graph.has_runtime(main));
  assert!(graph.chunk_table[vendor].is_initial());

  assert!(matches!(
    graph.insert_chunk_into_entrypoint(entrypoint, vendor, stray),
    Err(ConstraintViolation::EntrypointMissingChunk { .. })
  ));
}
