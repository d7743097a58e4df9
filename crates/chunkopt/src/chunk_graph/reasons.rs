use chunkopt_common::{ChunkIdx, ModuleIdx};
use chunkopt_utils::indexmap::{FxIndexSet, FxIndexSetExt};

use super::ChunkGraph;

impl ChunkGraph {
  /// Whether some reason of `module` applies to `chunk`.
  pub fn has_reason_for_chunk(&self, module: ModuleIdx, chunk: ChunkIdx) -> bool {
    self.module_table[module].reasons.iter().any(|reason| match &reason.chunks {
      Some(chunks) => chunks.contains(&chunk),
      None => reason.module.is_some_and(|origin| self.module_table[origin].is_in_chunk(chunk)),
    })
  }

  /// Points every reason of `module` that applies to `old_chunk` at `new_chunks` instead.
  ///
  /// Reasons without an explicit chunk list get one here, copied from the referencing module, so
  /// they keep describing the chunks they applied to before the rewrite.
  pub fn rewrite_chunk_in_reasons(
    &mut self,
    module: ModuleIdx,
    old_chunk: ChunkIdx,
    new_chunks: &[ChunkIdx],
  ) {
    let implicit_chunks = self.module_table[module]
      .reasons
      .iter()
      .map(|reason| match (&reason.chunks, reason.module) {
        (None, Some(origin)) if self.module_table[origin].is_in_chunk(old_chunk) => {
          Some(self.module_table[origin].chunks.iter().copied().collect::<FxIndexSet<_>>())
        }
        _ => None,
      })
      .collect::<Vec<_>>();

    for (reason, implicit) in self.module_table[module].reasons.iter_mut().zip(implicit_chunks) {
      if reason.chunks.is_none() {
        reason.chunks = implicit;
      }
      if let Some(chunks) = &mut reason.chunks {
        chunks.replace_in_place(&old_chunk, new_chunks.iter().copied());
      }
    }
  }

  /// Points every explicit reason chunk list of the graph that names `old_chunk` at `new_chunks`
  /// instead. Implicit lists follow module membership and need no rewrite.
  pub(super) fn replace_chunk_in_all_reasons(
    &mut self,
    old_chunk: ChunkIdx,
    new_chunks: &[ChunkIdx],
  ) {
    for module in self.module_table.iter_mut() {
      for chunks in module.reasons.iter_mut().filter_map(|reason| reason.chunks.as_mut()) {
        chunks.replace_in_place(&old_chunk, new_chunks.iter().copied());
      }
    }
  }
}

#[test]
fn test_rewrite_chunk_in_reasons() {
  use super::test_utils::module;

  let mut graph = ChunkGraph::new();
  let importer = module(&mut graph, "./index.js", 10);
  let lazy_importer = module(&mut graph, "./lazy.js", 10);
  let shared = module(&mut graph, "./shared.js", 10);
  let main = graph.create_chunk(None);
  let other = graph.create_chunk(None);
  let target = graph.create_chunk(None);
  graph.add_module_to_chunk(main, importer);
  graph.add_module_to_chunk(other, importer);
  graph.add_module_to_chunk(target, lazy_importer);
  graph.module_table[shared].add_reason(Some(importer), arcstr::literal!("import './shared'"));
  graph.module_table[shared]
    .add_reason(Some(lazy_importer), arcstr::literal!("import('./shared')"));

  assert!(graph.has_reason_for_chunk(shared, other));
  graph.rewrite_chunk_in_reasons(shared, other, &[target]);

  let reasons = &graph.module_table[shared].reasons;
  let chunks = reasons[0].chunks.as_ref().unwrap().iter().copied().collect::<Vec<_>>();
  assert_eq!(chunks, vec![main, target]);
  // Didn't apply to `other`, stays implicit.
  assert!(reasons[1].chunks.is_none());

  assert!(graph.has_reason_for_chunk(shared, target));
  assert!(!graph.has_reason_for_chunk(shared, other));
}
