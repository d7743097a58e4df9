use chunkopt_common::{ChunkIdx, NormalizedMinChunkSizeOptions, SizeOptions};
use rustc_hash::FxHashSet;

use super::OptimizeStage;

impl OptimizeStage<'_> {
  /// Merges the best pair involving a chunk below `min_chunk_size`. One merge per call.
  ///
  /// Whether a chunk is too small is judged by its plain module size, so small entry chunks
  /// aren't penalized.
  pub(super) fn merge_small_chunks(
    &mut self,
    options: &NormalizedMinChunkSizeOptions,
    chunks: &mut Vec<ChunkIdx>,
  ) -> bool {
    let is_small = |chunk: ChunkIdx| {
      self.graph.chunk_size(chunk, &SizeOptions::NEUTRAL) < options.min_chunk_size
    };
    let small_chunks =
      chunks.iter().copied().filter(|chunk| is_small(*chunk)).collect::<FxHashSet<_>>();
    if small_chunks.is_empty() {
      return false;
    }

    let Some(candidate) = self.best_merge_candidate(chunks, &options.size, |chunk, other| {
      small_chunks.contains(&chunk) || small_chunks.contains(&other)
    }) else {
      return false;
    };
    self.apply_merge_candidate(candidate, &arcstr::literal!("min-size"), chunks)
  }
}

#[cfg(test)]
mod tests {
  use chunkopt_common::{NormalizedMinChunkSizeOptions, SizeOptions};

  use crate::chunk_graph::test_utils::{chunk, entry_chunk, module, names};
  use crate::stages::optimize::test_utils::with_stage;

  fn min_size(min_chunk_size: u64) -> NormalizedMinChunkSizeOptions {
    NormalizedMinChunkSizeOptions { min_chunk_size, size: SizeOptions::default() }
  }

  #[test]
  fn test_merge_small_chunks() {
    let (graph, merges) = with_stage(
      |graph| {
        let big = module(graph, "./big.js", 5000);
        let [b, c, d] = ["./b.js", "./c.js", "./d.js"].map(|id| module(graph, id, 10));
        chunk(graph, "big", &[big]);
        chunk(graph, "small", &[b]);
        chunk(graph, "tiny", &[c, d]);
      },
      |stage, chunks| {
        let mut merges = Vec::new();
        while stage.merge_small_chunks(&min_size(100), chunks) {
          merges.push(chunks.len());
        }
        merges
      },
    );

    // `small` and `tiny` merge first, then the result is still below the floor and merges into
    // `big`.
    assert_eq!(merges, vec![2, 1]);
    assert_eq!(names(&graph, &graph.chunks), vec!["big"]);
    assert_eq!(graph.chunk_table[graph.chunks[0]].modules.len(), 4);
  }

  #[test]
  fn test_merge_small_chunks_ignores_big_chunks() {
    let (graph, changed) = with_stage(
      |graph| {
        let [a, b] = ["./a.js", "./b.js"].map(|id| module(graph, id, 500));
        chunk(graph, "first", &[a]);
        chunk(graph, "second", &[b]);
      },
      |stage, chunks| stage.merge_small_chunks(&min_size(100), chunks),
    );
    assert!(!changed);
    assert_eq!(graph.chunks.len(), 2);
  }

  #[test]
  fn test_merge_small_chunks_uses_neutral_size_for_entry_chunks() {
    let (graph, changed) = with_stage(
      |graph| {
        let [a, b] = ["./a.js", "./b.js"].map(|id| module(graph, id, 50));
        let main = entry_chunk(graph, "main", &[a]);
        let lazy = chunk(graph, "lazy", &[b]);
        graph.connect_chunks(main, lazy);
      },
      |stage, chunks| stage.merge_small_chunks(&min_size(100), chunks),
    );
    // 50 * 10 + 10000 would be far above the floor.
    assert!(changed);
    assert_eq!(names(&graph, &graph.chunks), vec!["main"]);
    assert_eq!(graph.chunk_table[graph.chunks[0]].modules.len(), 2);
  }
}
