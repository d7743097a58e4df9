use rustc_hash::FxHashSet;

use super::OptimizeStage;

/// Keeps the ids that are set and fills the gaps with the smallest unused ids, in order.
fn fill_ids(ids: &mut [Option<u32>]) {
  let used = ids.iter().flatten().copied().collect::<FxHashSet<_>>();
  let mut next_id = 0;
  for id in ids.iter_mut().filter(|id| id.is_none()) {
    while used.contains(&next_id) {
      next_id += 1;
    }
    *id = Some(next_id);
    next_id += 1;
  }
}

impl OptimizeStage<'_> {
  /// Numbers modules and chunks in their final order, then sorts their item lists by those ids.
  /// Ids that are already set survive when `record_ids` is enabled.
  pub(super) fn assign_ids(&mut self) {
    let record_ids = self.options.record_ids;
    let graph = &mut *self.graph;

    let modules = graph.sorted_modules.clone();
    let mut module_ids = modules
      .iter()
      .map(|module| graph.module_table[*module].id.filter(|_| record_ids))
      .collect::<Vec<_>>();
    fill_ids(&mut module_ids);
    for (module, id) in modules.iter().zip(module_ids) {
      graph.module_table[*module].id = id;
    }

    let chunks = graph.chunks.iter().chain(&graph.extracted_chunks).copied().collect::<Vec<_>>();
    let mut chunk_ids = chunks
      .iter()
      .map(|chunk| graph.chunk_table[*chunk].id.filter(|_| record_ids))
      .collect::<Vec<_>>();
    fill_ids(&mut chunk_ids);
    for (chunk, id) in chunks.iter().zip(chunk_ids) {
      graph.chunk_table[*chunk].id = id;
    }

    for module in modules {
      graph.sort_module_items(module);
    }
    for chunk in chunks {
      graph.sort_chunk_items(chunk);
    }
  }
}

#[test]
fn test_fill_ids() {
  let mut ids = [None, Some(1), None, Some(4), None, None];
  fill_ids(&mut ids);
  assert_eq!(ids, [Some(0), Some(1), Some(2), Some(4), Some(3), Some(5)]);
}
