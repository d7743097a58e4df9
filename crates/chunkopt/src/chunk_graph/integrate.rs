use std::mem;

use arcstr::ArcStr;
use chunkopt_common::ChunkIdx;
use tracing::trace;

use super::{ChunkGraph, push_unique, remove_item};

impl ChunkGraph {
  /// Entry chunks are never absorbed. An entry chunk may only absorb a chunk it exclusively
  /// spawned.
  pub fn can_be_integrated(&self, chunk: ChunkIdx, other: ChunkIdx) -> bool {
    let other = &self.chunk_table[other];
    if other.is_initial() {
      return false;
    }
    if self.chunk_table[chunk].is_initial() {
      return other.parents.len() == 1 && other.parents[0] == chunk;
    }
    true
  }

  /// Moves everything `other` holds into `chunk`.
  ///
  /// `other` is left empty and unlinked; removing it from its chunk list is up to the caller.
  /// Returns `false` without touching the graph if `other` can't be integrated.
  pub fn integrate(&mut self, chunk: ChunkIdx, other: ChunkIdx, reason: &ArcStr) -> bool {
    if chunk == other || !self.can_be_integrated(chunk, other) {
      return false;
    }
    trace!(
      "Integrating chunk {} into chunk {} ({reason})",
      self.chunk_table[other].debug_id,
      self.chunk_table[chunk].debug_id
    );

    for module in mem::take(&mut self.chunk_table[other].modules) {
      remove_item(&mut self.module_table[module].chunks, &other);
      self.add_module_to_chunk(chunk, module);
      self.rewrite_chunk_in_reasons(module, other, &[chunk]);
    }
    self.replace_chunk_in_all_reasons(other, &[chunk]);

    for parent in mem::take(&mut self.chunk_table[other].parents) {
      remove_item(&mut self.chunk_table[parent].children, &other);
      if parent != chunk && self.add_parent(chunk, parent) {
        self.add_child(parent, chunk);
      }
    }

    for child in mem::take(&mut self.chunk_table[other].children) {
      remove_item(&mut self.chunk_table[child].parents, &other);
      if child != chunk && self.add_child(chunk, child) {
        self.add_parent(child, chunk);
      }
    }

    for block in mem::take(&mut self.chunk_table[other].blocks) {
      let block_chunks = self.blocks[block].chunks.take().unwrap_or_else(|| vec![chunk]);
      let mut retargeted = Vec::with_capacity(block_chunks.len());
      for block_chunk in block_chunks {
        push_unique(&mut retargeted, if block_chunk == other { chunk } else { block_chunk });
      }
      self.blocks[block].chunks = Some(retargeted);
      self.blocks[block].chunk_reason = Some(reason.clone());
      self.chunk_table[chunk].add_block(block);
    }

    let other_origins = mem::take(&mut self.chunk_table[other].origins);
    let target = &mut self.chunk_table[chunk];
    target.origins.extend(other_origins);
    for origin in &mut target.origins {
      origin.push_front_reason(reason);
    }

    target.children.retain(|c| *c != other && *c != chunk);
    target.parents.retain(|c| *c != other && *c != chunk);
    true
  }
}

#[cfg(test)]
mod tests {
  use chunkopt_common::Origin;

  use super::super::test_utils::{chunk, entry_chunk, module};
  use super::*;

  #[test]
  fn test_can_be_integrated() {
    let mut graph = ChunkGraph::new();
    let main = entry_chunk(&mut graph, "main", &[]);
    let other_entry = entry_chunk(&mut graph, "other", &[]);
    let lazy = chunk(&mut graph, "lazy", &[]);
    let shared = chunk(&mut graph, "shared", &[]);
    graph.connect_chunks(main, lazy);
    graph.connect_chunks(main, shared);
    graph.connect_chunks(other_entry, shared);

    assert!(!graph.can_be_integrated(lazy, main));
    assert!(graph.can_be_integrated(main, lazy));
    assert!(!graph.can_be_integrated(main, shared));
    assert!(graph.can_be_integrated(lazy, shared));
    assert!(graph.can_be_integrated(shared, lazy));
  }

  #[test]
  fn test_integrate_leaves_an_empty_husk() {
    let mut graph = ChunkGraph::new();
    let [a, b, c] = ["./a.js", "./b.js", "./c.js"].map(|id| module(&mut graph, id, 100));
    let main = entry_chunk(&mut graph, "main", &[a]);
    let first = chunk(&mut graph, "first", &[b]);
    let second = chunk(&mut graph, "second", &[b, c]);
    let nested = chunk(&mut graph, "nested", &[]);
    graph.connect_chunks(main, first);
    graph.connect_chunks(main, second);
    graph.connect_chunks(second, nested);
    let block = graph.create_block(None, Some(a), None);
    graph.connect_block(second, block);
    graph.chunk_table[first].origins.push(Origin::new(Some(a), None, None));
    graph.chunk_table[second].origins.push(Origin::new(Some(a), None, None));

    assert!(graph.integrate(first, second, &arcstr::literal!("limit")));

    let husk = &graph.chunk_table[second];
    assert!(husk.modules.is_empty());
    assert!(husk.parents.is_empty());
    assert!(husk.children.is_empty());
    assert!(husk.blocks.is_empty());
    assert!(husk.origins.is_empty());

    let target = &graph.chunk_table[first];
    assert_eq!(target.modules, vec![b, c]);
    assert_eq!(target.parents, vec![main]);
    assert_eq!(target.children, vec![nested]);
    assert_eq!(graph.chunk_table[main].children, vec![first]);
    assert_eq!(graph.chunk_table[nested].parents, vec![first]);
    assert_eq!(graph.module_table[b].chunks, vec![first]);
    assert_eq!(graph.blocks[block].chunks, Some(vec![first]));
    assert_eq!(graph.blocks[block].chunk_reason.as_deref(), Some("limit"));
    assert_eq!(target.origins.len(), 2);
    assert!(target.origins.iter().all(|origin| origin.reasons == vec!["limit"]));
    graph.check_constraints().unwrap();
  }

  #[test]
  fn test_integrate_retargets_reasons_of_other_modules() {
    let mut graph = ChunkGraph::new();
    let [index, util, lazy_module] =
      ["./index.js", "./util.js", "./lazy.js"].map(|id| module(&mut graph, id, 10));
    let main = entry_chunk(&mut graph, "main", &[index, util]);
    let first = chunk(&mut graph, "first", &[]);
    let second = chunk(&mut graph, "second", &[lazy_module]);
    graph.connect_chunks(main, first);
    graph.connect_chunks(main, second);
    // `util` stays in `main`, but one of its reasons names `second` explicitly.
    graph.module_table[util].add_reason(Some(lazy_module), arcstr::literal!("import './util'"));
    graph.module_table[util].reasons[0].chunks = Some([second].into_iter().collect());

    assert!(graph.integrate(first, second, &arcstr::literal!("limit")));

    let reason_chunks = graph.module_table[util].reasons[0].chunks.as_ref().unwrap();
    assert_eq!(reason_chunks.iter().copied().collect::<Vec<_>>(), vec![first]);
    assert!(!graph.has_reason_for_chunk(util, second));
    assert!(graph.has_reason_for_chunk(util, first));
    graph.check_constraints().unwrap();
  }

  #[test]
  fn test_integrate_refuses_entry_chunks() {
    let mut graph = ChunkGraph::new();
    let a = module(&mut graph, "./a.js", 1);
    let main = entry_chunk(&mut graph, "main", &[a]);
    let lazy = chunk(&mut graph, "lazy", &[]);

    assert!(!graph.integrate(lazy, main, &arcstr::literal!("limit")));
    assert_eq!(graph.chunk_table[main].modules, vec![a]);
    assert!(!graph.integrate(main, main, &arcstr::literal!("limit")));
  }

  #[test]
  fn test_integrate_parent_into_child() {
    let mut graph = ChunkGraph::new();
    let root = chunk(&mut graph, "root", &[]);
    let parent = chunk(&mut graph, "parent", &[]);
    let child = chunk(&mut graph, "child", &[]);
    graph.connect_chunks(root, parent);
    graph.connect_chunks(parent, child);

    assert!(graph.integrate(child, parent, &arcstr::literal!("min-size")));
    assert_eq!(graph.chunk_table[child].parents, vec![root]);
    assert!(graph.chunk_table[child].children.is_empty());
    assert_eq!(graph.chunk_table[root].children, vec![child]);
    graph.check_constraints().unwrap();
  }
}
