use chunkopt_common::ChunkIdx;

use super::OptimizeStage;

impl OptimizeStage<'_> {
  pub(super) fn remove_empty_chunks(&mut self, chunks: &mut Vec<ChunkIdx>) -> bool {
    let reason = arcstr::literal!("empty");
    let len = chunks.len();
    chunks.retain(|chunk| {
      let is_removable = self.graph.chunk_table[*chunk].is_empty()
        && !self.graph.has_runtime(*chunk)
        && !self.graph.chunk_table[*chunk].has_entry_module();
      if is_removable {
        self.graph.remove_chunk(*chunk, &reason);
      }
      !is_removable
    });
    chunks.len() != len
  }
}

#[test]
fn test_remove_empty_chunks() {
  use crate::chunk_graph::test_utils::{chunk, entry_chunk, module, names};
  use crate::stages::optimize::test_utils::with_stage;

  let (graph, changed) = with_stage(
    |graph| {
      let a = module(graph, "./a.js", 10);
      let main = entry_chunk(graph, "main", &[a]);
      let empty = chunk(graph, "empty", &[]);
      let leaf = chunk(graph, "leaf", &[a]);
      // An empty runtime chunk stays.
      entry_chunk(graph, "bare", &[]);
      graph.connect_chunks(main, empty);
      graph.connect_chunks(empty, leaf);
    },
    |stage, chunks| stage.remove_empty_chunks(chunks),
  );

  assert!(changed);
  assert_eq!(names(&graph, &graph.chunks), vec!["main", "leaf", "bare"]);
  let (main, leaf) = (graph.chunks[0], graph.chunks[1]);
  assert_eq!(graph.chunk_table[main].children, vec![leaf]);
  assert_eq!(graph.chunk_table[leaf].parents, vec![main]);
}
