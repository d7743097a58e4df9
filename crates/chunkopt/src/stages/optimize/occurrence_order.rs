use std::cmp::Reverse;

use chunkopt_common::{ChunkIdx, ModuleIdx};
use rustc_hash::FxHashMap;

use super::OptimizeStage;

impl OptimizeStage<'_> {
  /// Orders `graph.sorted_modules` so that the most referenced modules come first and get the
  /// smallest ids.
  pub(super) fn sort_modules_by_occurrence(&mut self, prefer_entry: bool, chunks: &[ChunkIdx]) {
    self.sort_chunk_modules_by_identifier(chunks);

    let graph = &*self.graph;
    let entry_chunks = |module: ModuleIdx| -> usize {
      graph.module_table[module]
        .chunks
        .iter()
        .map(|chunk| {
          let chunk = &graph.chunk_table[*chunk];
          usize::from(chunk.is_initial()) + usize::from(chunk.entry_module == Some(module))
        })
        .sum()
    };
    let keys = graph
      .sorted_modules
      .iter()
      .map(|&module| {
        let referencing_modules =
          graph.module_table[module].reasons.iter().filter_map(|reason| reason.module);
        let occurs_in_entry = if prefer_entry {
          referencing_modules.clone().map(&entry_chunks).sum::<usize>() + entry_chunks(module)
        } else {
          0
        };
        let occurs = referencing_modules
          .map(|origin| graph.module_table[origin].chunks.len())
          .sum::<usize>()
          + graph.module_table[module].chunks.len();
        (module, (occurs_in_entry, occurs))
      })
      .collect::<FxHashMap<_, _>>();

    let mut sorted_modules = std::mem::take(&mut self.graph.sorted_modules);
    sorted_modules.sort_by(|a, b| {
      Reverse(keys[a])
        .cmp(&Reverse(keys[b]))
        .then_with(|| self.graph.identifier(*a).cmp(self.graph.identifier(*b)))
    });
    self.graph.sorted_modules = sorted_modules;
  }

  /// Orders `chunks` by how often they are loaded: chunks spawned by more entry chunks first,
  /// then chunks implementing more blocks, then bigger chunks.
  pub(super) fn sort_chunks_by_occurrence(&mut self, chunks: &mut [ChunkIdx]) {
    self.sort_chunk_modules_by_identifier(chunks);

    let graph = &*self.graph;
    let keys = chunks
      .iter()
      .map(|&chunk| {
        let chunk = &graph.chunk_table[chunk];
        let initial_parents =
          chunk.parents.iter().filter(|parent| graph.chunk_table[**parent].is_initial()).count();
        (chunk.idx, (initial_parents, chunk.blocks.len(), chunk.modules.len()))
      })
      .collect::<FxHashMap<_, _>>();

    chunks.sort_by(|a, b| {
      Reverse(keys[a]).cmp(&Reverse(keys[b])).then_with(|| {
        let identifiers = |chunk: &ChunkIdx| {
          graph.chunk_table[*chunk].modules.iter().map(|module| graph.identifier(*module))
        };
        identifiers(a).cmp(identifiers(b))
      })
    });
  }

  fn sort_chunk_modules_by_identifier(&mut self, chunks: &[ChunkIdx]) {
    for chunk in chunks {
      let mut modules = std::mem::take(&mut self.graph.chunk_table[*chunk].modules);
      modules.sort_by(|a, b| self.graph.identifier(*a).cmp(self.graph.identifier(*b)));
      self.graph.chunk_table[*chunk].modules = modules;
    }
  }
}

#[cfg(test)]
mod tests {
  use chunkopt_common::ModuleIdx;

  use crate::chunk_graph::{
    ChunkGraph,
    test_utils::{chunk, entry_chunk, module, names},
  };
  use crate::stages::optimize::test_utils::with_stage;

  fn identifiers(graph: &ChunkGraph, modules: &[ModuleIdx]) -> Vec<String> {
    modules.iter().map(|module| graph.identifier(*module).to_string()).collect()
  }

  fn lazy_graph(graph: &mut ChunkGraph) {
    let [index, p, q] = ["./index.js", "./p.js", "./q.js"].map(|id| module(graph, id, 10));
    let main = entry_chunk(graph, "main", &[index]);
    let lazy1 = chunk(graph, "lazy1", &[q, p]);
    let lazy2 = chunk(graph, "lazy2", &[q]);
    graph.connect_chunks(main, lazy1);
    graph.connect_chunks(main, lazy2);
    graph.module_table[p].add_reason(Some(index), arcstr::literal!("import('./p')"));
    graph.module_table[q].add_reason(Some(p), arcstr::literal!("import './q'"));
  }

  #[test]
  fn test_sort_modules_by_occurrence() {
    let (graph, first) = with_stage(lazy_graph, |stage, chunks| {
      stage.sort_modules_by_occurrence(false, chunks);
      stage.graph.sorted_modules.clone()
    });
    // `./q.js` is in two chunks and referenced from one.
    assert_eq!(identifiers(&graph, &first), vec!["./q.js", "./p.js", "./index.js"]);
    // Chunk modules get sorted as well.
    let lazy1 = graph.chunks[1];
    assert_eq!(identifiers(&graph, &graph.chunk_table[lazy1].modules), vec!["./p.js", "./q.js"]);
  }

  #[test]
  fn test_sort_modules_by_occurrence_prefers_entry() {
    let (graph, sorted) = with_stage(lazy_graph, |stage, chunks| {
      stage.sort_modules_by_occurrence(true, chunks);
      let first = stage.graph.sorted_modules.clone();
      stage.sort_modules_by_occurrence(true, chunks);
      assert_eq!(stage.graph.sorted_modules, first);
      first
    });
    // `./p.js` and `./index.js` are both loaded at startup, `./q.js` only on demand.
    assert_eq!(identifiers(&graph, &sorted), vec!["./p.js", "./index.js", "./q.js"]);
  }

  #[test]
  fn test_sort_chunks_by_occurrence() {
    let (graph, ()) = with_stage(
      |graph| {
        let [index, a, b, c, d, e] = ["index", "a", "b", "c", "d", "e"]
          .map(|name| module(graph, &format!("./{name}.js"), 10));
        let main = entry_chunk(graph, "main", &[index]);
        let c1 = chunk(graph, "c1", &[b, a]);
        let c2 = chunk(graph, "c2", &[c]);
        chunk(graph, "c3", &[d]);
        chunk(graph, "c4", &[e]);
        graph.connect_chunks(main, c1);
        graph.connect_chunks(main, c2);
        let blocks = [(c1, 1), (c2, 2)];
        for (chunk, count) in blocks {
          for _ in 0..count {
            let block = graph.create_block(None, Some(index), None);
            graph.connect_block(chunk, block);
          }
        }
      },
      |stage, chunks| {
        stage.sort_chunks_by_occurrence(chunks);
        let first = chunks.clone();
        stage.sort_chunks_by_occurrence(chunks);
        assert_eq!(*chunks, first);
      },
    );

    assert_eq!(names(&graph, &graph.chunks), vec!["c2", "c1", "c3", "c4", "main"]);
    let c1 = graph.chunks[1];
    assert_eq!(identifiers(&graph, &graph.chunk_table[c1].modules), vec!["./a.js", "./b.js"]);
  }
}
