use std::mem;

use arcstr::ArcStr;
use chunkopt_common::{ChunkIdx, ModuleIdx};
use chunkopt_error::ConstraintViolation;
use tracing::trace;

use super::{ChunkGraph, remove_item};

impl ChunkGraph {
  /// Disconnects `chunk` from everything. Its parents adopt its children, so whatever was
  /// reachable through it stays reachable.
  ///
  /// Blocks left without any chunk get `chunks = None` and `reason` as their chunk reason.
  /// Explicit reason chunk lists forget `chunk`.
  pub fn remove_chunk(&mut self, chunk: ChunkIdx, reason: &ArcStr) {
    trace!("Removing chunk {} ({reason})", self.chunk_table[chunk].debug_id);
    self.replace_chunk_in_all_reasons(chunk, &[]);

    for module in mem::take(&mut self.chunk_table[chunk].modules) {
      remove_item(&mut self.module_table[module].chunks, &chunk);
    }

    let parents = mem::take(&mut self.chunk_table[chunk].parents);
    let children = mem::take(&mut self.chunk_table[chunk].children);
    for parent in &parents {
      remove_item(&mut self.chunk_table[*parent].children, &chunk);
    }
    for child in &children {
      remove_item(&mut self.chunk_table[*child].parents, &chunk);
    }
    for parent in &parents {
      for child in &children {
        self.connect_chunks(*parent, *child);
      }
    }

    for block in mem::take(&mut self.chunk_table[chunk].blocks) {
      let block = &mut self.blocks[block];
      if let Some(chunks) = &mut block.chunks {
        if remove_item(chunks, &chunk) && chunks.is_empty() {
          block.chunks = None;
          block.chunk_reason = Some(reason.clone());
        }
      }
    }

    for entrypoint in mem::take(&mut self.chunk_table[chunk].entrypoints) {
      self.entrypoints[entrypoint].remove_chunk(chunk);
    }
  }

  pub fn move_module(&mut self, module: ModuleIdx, from: ChunkIdx, to: ChunkIdx) {
    self.remove_module_from_chunk(from, module);
    self.add_module_to_chunk(to, module);
    self.rewrite_chunk_in_reasons(module, from, &[to]);
  }

  /// Lets `new_chunk` share the position of `chunk` in the graph: same blocks, same parents and
  /// children, loaded right before `chunk` by every entrypoint of it. Nothing is taken away from
  /// `chunk`.
  pub fn split(&mut self, chunk: ChunkIdx, new_chunk: ChunkIdx) -> Result<(), ConstraintViolation> {
    let blocks = self.chunk_table[chunk].blocks.iter().copied().collect::<Vec<_>>();
    for block in blocks {
      self.connect_block(new_chunk, block);
    }
    for child in self.chunk_table[chunk].children.clone() {
      self.connect_chunks(new_chunk, child);
    }
    for parent in self.chunk_table[chunk].parents.clone() {
      self.connect_chunks(parent, new_chunk);
    }
    for entrypoint in self.chunk_table[chunk].entrypoints.clone() {
      self.insert_chunk_into_entrypoint(entrypoint, new_chunk, chunk)?;
    }
    Ok(())
  }

  /// Takes `module` out of every chunk and forgets its reasons and id, e.g. before a rebuild.
  pub fn disconnect_module(&mut self, module: ModuleIdx) {
    for chunk in mem::take(&mut self.module_table[module].chunks) {
      remove_item(&mut self.chunk_table[chunk].modules, &module);
    }
    self.module_table[module].disconnect();
  }
}

#[cfg(test)]
mod tests {
  use super::super::test_utils::{chunk, entry_chunk, module};
  use super::*;

  #[test]
  fn test_remove_splices_chunk_out() {
    let mut graph = ChunkGraph::new();
    let a = module(&mut graph, "./a.js", 1);
    let main = entry_chunk(&mut graph, "main", &[a]);
    let other = entry_chunk(&mut graph, "other", &[]);
    let middle = chunk(&mut graph, "middle", &[]);
    let leaf = chunk(&mut graph, "leaf", &[a]);
    graph.connect_chunks(main, middle);
    graph.connect_chunks(other, middle);
    graph.connect_chunks(middle, leaf);

    graph.remove_chunk(middle, &arcstr::literal!("empty"));

    assert_eq!(graph.chunk_table[main].children, vec![leaf]);
    assert_eq!(graph.chunk_table[other].children, vec![leaf]);
    assert_eq!(graph.chunk_table[leaf].parents, vec![main, other]);
    assert!(graph.chunk_table[middle].parents.is_empty());
    assert!(graph.chunk_table[middle].children.is_empty());
    graph.check_constraints().unwrap();
  }

  #[test]
  fn test_remove_drops_chunk_from_explicit_reasons() {
    let mut graph = ChunkGraph::new();
    let index = module(&mut graph, "./index.js", 1);
    let util = module(&mut graph, "./util.js", 1);
    let main = entry_chunk(&mut graph, "main", &[index, util]);
    let lazy = chunk(&mut graph, "lazy", &[]);
    graph.connect_chunks(main, lazy);
    graph.module_table[util].add_reason(Some(index), arcstr::literal!("import './util'"));
    graph.module_table[util].reasons[0].chunks = Some([main, lazy].into_iter().collect());
    assert!(graph.has_reason_for_chunk(util, lazy));

    graph.remove_chunk(lazy, &arcstr::literal!("empty"));

    let reason_chunks = graph.module_table[util].reasons[0].chunks.as_ref().unwrap();
    assert_eq!(reason_chunks.iter().copied().collect::<Vec<_>>(), vec![main]);
    assert!(!graph.has_reason_for_chunk(util, lazy));
    assert!(graph.has_reason_for_chunk(util, main));
  }

  #[test]
  fn test_remove_nulls_orphaned_blocks() {
    let mut graph = ChunkGraph::new();
    let a = module(&mut graph, "./a.js", 1);
    let b = module(&mut graph, "./b.js", 1);
    let first = chunk(&mut graph, "first", &[a]);
    let second = chunk(&mut graph, "second", &[b]);
    let shared_block = graph.create_block(None, None, None);
    let own_block = graph.create_block(None, None, None);
    graph.connect_block(first, shared_block);
    graph.connect_block(second, shared_block);
    graph.connect_block(first, own_block);

    graph.remove_chunk(first, &arcstr::literal!("empty"));

    assert_eq!(graph.blocks[shared_block].chunks, Some(vec![second]));
    assert_eq!(graph.blocks[shared_block].chunk_reason, None);
    assert_eq!(graph.blocks[own_block].chunks, None);
    assert_eq!(graph.blocks[own_block].chunk_reason.as_deref(), Some("empty"));
    assert!(graph.module_table[a].chunks.is_empty());
  }

  #[test]
  fn test_move_module() {
    let mut graph = ChunkGraph::new();
    let index = module(&mut graph, "./index.js", 1);
    let util = module(&mut graph, "./util.js", 1);
    let from = chunk(&mut graph, "from", &[index, util]);
    let to = chunk(&mut graph, "to", &[]);
    graph.module_table[util].add_reason(Some(index), arcstr::literal!("import './util'"));

    graph.move_module(util, from, to);

    assert_eq!(graph.chunk_table[from].modules, vec![index]);
    assert_eq!(graph.chunk_table[to].modules, vec![util]);
    assert_eq!(graph.module_table[util].chunks, vec![to]);
    let reason_chunks = graph.module_table[util].reasons[0].chunks.as_ref().unwrap();
    assert_eq!(reason_chunks.iter().copied().collect::<Vec<_>>(), vec![to]);
  }

  #[test]
  fn test_split() {
    let mut graph = ChunkGraph::new();
    let main = entry_chunk(&mut graph, "main", &[]);
    let lazy = chunk(&mut graph, "lazy", &[]);
    graph.connect_chunks(main, lazy);
    let block = graph.create_block(None, None, None);
    graph.connect_block(main, block);
    let split = graph.create_chunk(Some(arcstr::literal!("split")));

    graph.split(main, split).unwrap();

    let entrypoint = graph.chunk_table[main].entrypoints[0];
    assert_eq!(graph.entrypoints[entrypoint].chunks, vec![split, main]);
    assert_eq!(graph.chunk_table[split].children, vec![lazy]);
    assert_eq!(graph.chunk_table[lazy].parents, vec![main, split]);
    assert_eq!(graph.blocks[block].chunks, Some(vec![main, split]));
    // Additive: `main` keeps everything.
    assert_eq!(graph.chunk_table[main].children, vec![lazy]);
    assert!(graph.has_runtime(split));
    graph.check_constraints().unwrap();
  }

  #[test]
  fn test_disconnect_module() {
    let mut graph = ChunkGraph::new();
    let a = module(&mut graph, "./a.js", 1);
    let first = chunk(&mut graph, "first", &[a]);
    let second = chunk(&mut graph, "second", &[a]);
    graph.module_table[a].id = Some(3);

    graph.disconnect_module(a);

    assert!(graph.chunk_table[first].is_empty());
    assert!(graph.chunk_table[second].is_empty());
    assert_eq!(graph.module_table[a].last_id, Some(3));
    graph.check_constraints().unwrap();
  }
}
