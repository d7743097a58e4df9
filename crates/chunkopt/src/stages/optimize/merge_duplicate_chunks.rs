use chunkopt_common::ChunkIdx;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use super::OptimizeStage;

impl OptimizeStage<'_> {
  /// Integrates every chunk into the first chunk seen with exactly the same modules. Chunks with
  /// a runtime or an entry module are left alone.
  pub(super) fn merge_duplicate_chunks(&mut self, chunks: &mut Vec<ChunkIdx>) -> bool {
    let reason = arcstr::literal!("duplicate");
    let mut representatives: FxHashMap<String, ChunkIdx> = FxHashMap::default();
    let mut merged = Vec::new();

    for chunk in chunks.iter().copied() {
      if self.graph.has_runtime(chunk) || self.graph.chunk_table[chunk].has_entry_module() {
        continue;
      }
      let key = self.chunk_key(chunk);
      match representatives.get(&key) {
        Some(representative) => {
          if self.graph.integrate(*representative, chunk, &reason) {
            merged.push(chunk);
          }
        }
        None => {
          representatives.insert(key, chunk);
        }
      }
    }

    chunks.retain(|chunk| !merged.contains(chunk));
    !merged.is_empty()
  }

  /// Sorted module identifiers, joined.
  fn chunk_key(&self, chunk: ChunkIdx) -> String {
    self.graph.chunk_table[chunk]
      .modules
      .iter()
      .map(|module| self.graph.identifier(*module))
      .sorted_unstable()
      .join(", ")
  }
}

#[cfg(test)]
mod tests {
  use crate::chunk_graph::test_utils::{chunk, entry_chunk, module, names};
  use crate::stages::optimize::test_utils::with_stage;

  #[test]
  fn test_merge_duplicate_chunks() {
    let (graph, changed) = with_stage(
      |graph| {
        let [m1, m2, m3] = ["./m1.js", "./m2.js", "./m3.js"].map(|id| module(graph, id, 10));
        let main = entry_chunk(graph, "main", &[m1]);
        for (name, modules) in [("a", vec![m1, m2]), ("b", vec![m2, m1]), ("c", vec![m3])] {
          let lazy = chunk(graph, name, &modules);
          graph.connect_chunks(main, lazy);
          graph.chunk_table[lazy].add_origin(Some(m1), None);
        }
      },
      |stage, chunks| stage.merge_duplicate_chunks(chunks),
    );

    assert!(changed);
    assert_eq!(names(&graph, &graph.chunks), vec!["main", "a", "c"]);
    let a = graph.chunks[1];
    assert_eq!(graph.chunk_table[a].modules.len(), 2);
    assert_eq!(graph.chunk_table[a].origins.len(), 2);
  }

  #[test]
  fn test_merge_duplicate_chunks_skips_entry_chunks() {
    let (graph, changed) = with_stage(
      |graph| {
        let m1 = module(graph, "./m1.js", 10);
        entry_chunk(graph, "main", &[m1]);
        entry_chunk(graph, "other", &[m1]);
      },
      |stage, chunks| stage.merge_duplicate_chunks(chunks),
    );

    assert!(!changed);
    assert_eq!(names(&graph, &graph.chunks), vec!["main", "other"]);
  }
}
