use chunkopt_common::{ChunkIdx, ModuleIdx, SizeOptions};
use itertools::Itertools;

use super::ChunkGraph;

impl ChunkGraph {
  /// Estimated cost of loading `chunk`. Modules of initial chunks weigh more since they delay
  /// startup.
  pub fn chunk_size(&self, chunk: ChunkIdx, options: &SizeOptions) -> u64 {
    let chunk = &self.chunk_table[chunk];
    let modules_size = self.modules_size(chunk.modules.iter().copied());
    let multiplicator = if chunk.is_initial() { options.entry_chunk_multiplicator } else { 1 };
    weighted_size(modules_size, multiplicator, options)
  }

  /// The size `chunk` would have after integrating `other`, or `None` if it can't.
  pub fn integrated_size(
    &self,
    chunk: ChunkIdx,
    other: ChunkIdx,
    options: &SizeOptions,
  ) -> Option<u64> {
    if !self.can_be_integrated(chunk, other) {
      return None;
    }
    let (a, b) = (&self.chunk_table[chunk], &self.chunk_table[other]);
    let modules_size = self.modules_size(a.modules.iter().chain(&b.modules).copied().unique());
    let multiplicator =
      if a.is_initial() || b.is_initial() { options.entry_chunk_multiplicator } else { 1 };
    Some(weighted_size(modules_size, multiplicator, options))
  }

  fn modules_size(&self, modules: impl Iterator<Item = ModuleIdx>) -> u64 {
    modules.fold(0, |size, module| size.saturating_add(self.module_table[module].size()))
  }
}

/// Sizes saturate at `u64::MAX` instead of overflowing.
fn weighted_size(modules_size: u64, multiplicator: u64, options: &SizeOptions) -> u64 {
  modules_size.saturating_mul(multiplicator).saturating_add(options.chunk_overhead)
}

#[test]
fn test_chunk_size() {
  use super::test_utils::{chunk, entry_chunk, module};

  let mut graph = ChunkGraph::new();
  let a = module(&mut graph, "./a.js", 100);
  let b = module(&mut graph, "./b.js", 50);
  let main = entry_chunk(&mut graph, "main", &[a]);
  let lazy = chunk(&mut graph, "lazy", &[a, b]);
  let other = chunk(&mut graph, "other", &[b]);
  graph.connect_chunks(main, lazy);

  let options = SizeOptions::default();
  assert_eq!(graph.chunk_size(main, &options), 100 * 10 + 10000);
  assert_eq!(graph.chunk_size(lazy, &options), 150 + 10000);
  assert_eq!(graph.chunk_size(lazy, &SizeOptions::NEUTRAL), 151);

  // Shared modules count once.
  assert_eq!(graph.integrated_size(lazy, other, &options), Some(150 + 10000));
  // The entry chunk exclusively spawned `lazy`.
  assert_eq!(graph.integrated_size(main, lazy, &options), Some(150 * 10 + 10000));
  assert_eq!(graph.integrated_size(main, other, &options), None);
  assert_eq!(graph.integrated_size(lazy, main, &options), None);
}

#[test]
fn test_chunk_size_saturates() {
  use super::test_utils::{chunk, entry_chunk, module};

  let mut graph = ChunkGraph::new();
  let huge = module(&mut graph, "./huge.js", u64::MAX / 2);
  let also_huge = module(&mut graph, "./also-huge.js", u64::MAX / 2 + 10);
  let main = entry_chunk(&mut graph, "main", &[huge]);
  let lazy = chunk(&mut graph, "lazy", &[huge, also_huge]);
  let other = chunk(&mut graph, "other", &[also_huge]);
  graph.connect_chunks(main, lazy);

  let options = SizeOptions::default();
  assert_eq!(graph.chunk_size(main, &options), u64::MAX);
  assert_eq!(graph.chunk_size(lazy, &SizeOptions::NEUTRAL), u64::MAX);
  assert_eq!(graph.integrated_size(other, lazy, &options), Some(u64::MAX));
  assert_eq!(graph.integrated_size(main, lazy, &options), Some(u64::MAX));
}
