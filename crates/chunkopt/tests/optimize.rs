use chunkopt::{ChunkGraph, GraphSnapshot, OptimizeOptions, OptimizeOutput, Optimizer};
use serde_json::{Value, json};

fn optimize(graph: Value, options: Value) -> (ChunkGraph, OptimizeOutput) {
  let snapshot: GraphSnapshot = serde_json::from_value(graph).unwrap();
  let mut options: OptimizeOptions = serde_json::from_value(options).unwrap();
  options.check_constraints = Some(true);
  let mut graph = ChunkGraph::from_snapshot(&snapshot).unwrap();
  let output = Optimizer::new(options).unwrap().optimize(&mut graph).unwrap();
  graph.check_constraints().unwrap();
  (graph, output)
}

fn two_entries_sharing_react() -> Value {
  json!({
    "modules": [
      { "request": "./app.js", "size": 1200 },
      { "request": "./admin.js", "size": 900 },
      { "request": "./react.js", "size": 6400 },
      { "request": "./lazy.js", "size": 300 }
    ],
    "chunks": [
      { "name": "app", "modules": ["./app.js", "./react.js"], "entryModule": "./app.js" },
      { "name": "admin", "modules": ["./admin.js", "./react.js"], "entryModule": "./admin.js" },
      { "name": "lazy", "modules": ["./lazy.js", "./react.js"], "parents": [0] }
    ],
    "blocks": [{ "module": "./app.js", "chunks": [2] }],
    "entrypoints": [{ "name": "app", "chunks": [0] }, { "name": "admin", "chunks": [1] }]
  })
}

#[test]
fn commons_chunk_takes_over_the_runtime() {
  let (graph, output) = optimize(
    two_entries_sharing_react(),
    json!({ "optimizations": [{ "type": "commons-chunk", "name": "vendor", "minChunks": 2 }] }),
  );
  let snapshot = graph.to_snapshot();

  assert!(output.warnings.is_empty());
  assert!(output.errors.is_empty());
  // The extraction round, then one round without changes.
  assert_eq!(output.iterations, 2);

  let names = snapshot.chunks.iter().map(|chunk| chunk.name.as_deref()).collect::<Vec<_>>();
  assert_eq!(names, [Some("app"), Some("admin"), Some("lazy"), Some("vendor")]);
  assert_eq!(snapshot.chunks[3].modules, ["./react.js"]);
  assert_eq!(snapshot.chunks[0].modules, ["./app.js"]);
  assert_eq!(snapshot.chunks[1].modules, ["./admin.js"]);
  // Only entry chunks are candidates in normal mode.
  assert_eq!(snapshot.chunks[2].modules, ["./react.js", "./lazy.js"]);

  assert_eq!(snapshot.chunks[0].parents, [3]);
  assert_eq!(snapshot.chunks[1].parents, [3]);
  assert_eq!(snapshot.chunks[2].parents, [0]);
  assert!(snapshot.chunks[3].parents.is_empty());

  assert_eq!(snapshot.entrypoints[0].chunks, [3, 0]);
  assert_eq!(snapshot.entrypoints[1].chunks, [3, 1]);

  let vendor = graph.chunks[3];
  assert!(graph.has_runtime(vendor));
  assert!(!graph.has_runtime(graph.chunks[0]));
  let ids = graph.chunks.iter().map(|chunk| graph.chunk_table[*chunk].id).collect::<Vec<_>>();
  assert_eq!(ids, [Some(0), Some(1), Some(2), Some(3)]);
}

#[test]
fn unsettled_optimizations_are_reported() {
  let (graph, output) = optimize(
    two_entries_sharing_react(),
    json!({
      "maxIterations": 1,
      "optimizations": [{ "type": "commons-chunk", "name": "vendor" }]
    }),
  );

  assert_eq!(output.iterations, 1);
  assert_eq!(output.warnings.len(), 1);
  assert_eq!(
    output.warnings[0].to_string(),
    "Chunk optimizations didn't settle after 1 iterations"
  );
  // Ordering and ids still happen.
  assert!(graph.chunks.iter().all(|chunk| graph.chunk_table[*chunk].id.is_some()));
}

#[test]
fn duplicates_are_merged_and_empty_chunks_spliced_out() {
  let (graph, output) = optimize(
    json!({
      "modules": [
        { "request": "./main.js", "size": 100 },
        { "request": "./x.js", "size": 50 },
        { "request": "./y.js", "size": 70 }
      ],
      "chunks": [
        { "name": "main", "modules": ["./main.js"], "entryModule": "./main.js" },
        { "name": "a", "modules": ["./x.js"], "parents": [0] },
        { "name": "b", "modules": ["./x.js"], "parents": [0] },
        { "name": "empty", "parents": [0] },
        { "name": "leaf", "modules": ["./y.js"], "parents": [3] }
      ],
      "blocks": [
        { "name": "a", "module": "./main.js", "chunks": [1] },
        { "name": "b", "module": "./main.js", "chunks": [2] },
        { "name": "empty", "module": "./main.js", "chunks": [3] }
      ],
      "entrypoints": [{ "name": "main", "chunks": [0] }]
    }),
    json!({
      "optimizations": [{ "type": "merge-duplicate-chunks" }, { "type": "remove-empty-chunks" }]
    }),
  );
  let snapshot = graph.to_snapshot();

  assert!(output.warnings.is_empty());
  assert_eq!(output.iterations, 3);

  let names = snapshot.chunks.iter().map(|chunk| chunk.name.as_deref()).collect::<Vec<_>>();
  assert_eq!(names, [Some("main"), Some("a"), Some("leaf")]);
  // The parent of the removed chunk adopted its child.
  assert_eq!(snapshot.chunks[2].parents, [0]);
  let main = &graph.chunk_table[graph.chunks[0]];
  assert_eq!(main.children, [graph.chunks[1], graph.chunks[2]]);

  // Block `b` now loads `a`. Block `empty` lost its only chunk.
  let block_b = &graph.blocks[chunkopt::BlockIdx::from_raw(1)];
  assert_eq!(block_b.chunks.as_deref(), Some(&[graph.chunks[1]][..]));
  assert_eq!(block_b.chunk_reason.as_deref(), Some("duplicate"));
  let block_empty = &graph.blocks[chunkopt::BlockIdx::from_raw(2)];
  assert_eq!(block_empty.chunks, None);
  assert_eq!(block_empty.chunk_reason.as_deref(), Some("empty"));
}

#[test]
fn extracted_chunks_are_optimized_after_the_chunk_phases() {
  let (graph, output) = optimize(
    json!({
      "modules": [
        { "request": "./main.js", "size": 100 },
        { "request": "./lazy.js", "size": 40 },
        { "request": "./worker.js", "size": 60 }
      ],
      "chunks": [
        { "name": "main", "modules": ["./main.js"], "entryModule": "./main.js" },
        { "name": "lazy", "modules": ["./lazy.js"], "parents": [0] }
      ],
      "extractedChunks": [
        { "name": "extracted-empty", "parents": [0] },
        { "name": "worker", "modules": ["./worker.js"], "parents": [2] }
      ],
      "blocks": [
        { "module": "./main.js", "chunks": [1] },
        { "module": "./main.js", "chunks": [2] }
      ],
      "entrypoints": [{ "name": "main", "chunks": [0] }]
    }),
    json!({ "optimizations": [{ "type": "remove-empty-chunks" }] }),
  );
  let snapshot = graph.to_snapshot();

  assert!(output.warnings.is_empty());
  // Nothing to do for the regular chunks.
  assert_eq!(output.iterations, 1);
  assert_eq!(graph.chunks.len(), 2);

  let names =
    snapshot.extracted_chunks.iter().map(|chunk| chunk.name.as_deref()).collect::<Vec<_>>();
  assert_eq!(names, [Some("worker")]);
  // `main` adopted the child of the removed extracted chunk.
  assert_eq!(snapshot.extracted_chunks[0].parents, [0]);
  let worker = graph.extracted_chunks[0];
  assert_eq!(graph.chunk_table[graph.chunks[0]].children, [graph.chunks[1], worker]);

  let block = &graph.blocks[chunkopt::BlockIdx::from_raw(1)];
  assert_eq!(block.chunks, None);
  assert_eq!(block.chunk_reason.as_deref(), Some("empty"));

  // One id sequence across regular and extracted chunks.
  let ids = graph
    .chunks
    .iter()
    .chain(&graph.extracted_chunks)
    .map(|chunk| graph.chunk_table[*chunk].id)
    .collect::<Vec<_>>();
  assert_eq!(ids, [Some(0), Some(1), Some(2)]);
}

#[test]
fn limit_chunk_count_folds_lazy_chunks_into_the_entry() {
  let (graph, output) = optimize(
    json!({
      "modules": [
        { "request": "./main.js", "size": 1000 },
        { "request": "./a.js", "size": 10 },
        { "request": "./b.js", "size": 20 },
        { "request": "./c.js", "size": 30 }
      ],
      "chunks": [
        { "name": "main", "modules": ["./main.js"], "entryModule": "./main.js" },
        { "modules": ["./a.js"], "parents": [0] },
        { "modules": ["./b.js"], "parents": [0] },
        { "modules": ["./c.js"], "parents": [0] }
      ],
      "blocks": [
        { "module": "./main.js", "chunks": [1] },
        { "module": "./main.js", "chunks": [2] },
        { "module": "./main.js", "chunks": [3] }
      ],
      "entrypoints": [{ "name": "main", "chunks": [0] }]
    }),
    json!({ "optimizations": [{ "type": "limit-chunk-count", "maxChunks": 1 }] }),
  );

  assert!(output.warnings.is_empty());
  assert_eq!(graph.chunks.len(), 1);
  let main = graph.chunks[0];
  assert_eq!(graph.chunk_table[main].name.as_deref(), Some("main"));
  assert_eq!(graph.chunk_table[main].modules.len(), 4);
  assert!(graph.chunk_table[main].children.is_empty());
  for block in graph.blocks.iter() {
    assert_eq!(block.chunks.as_deref(), Some(&[main][..]));
    assert_eq!(block.chunk_reason.as_deref(), Some("limit"));
  }
}

#[test]
fn min_chunk_size_merges_small_chunks() {
  let (graph, _) = optimize(
    json!({
      "modules": [
        { "request": "./main.js", "size": 1000 },
        { "request": "./tiny-a.js", "size": 5 },
        { "request": "./tiny-b.js", "size": 5 },
        { "request": "./huge.js", "size": 50000 }
      ],
      "chunks": [
        { "name": "main", "modules": ["./main.js"], "entryModule": "./main.js" },
        { "name": "tiny-a", "modules": ["./tiny-a.js"], "parents": [0] },
        { "name": "tiny-b", "modules": ["./tiny-b.js"], "parents": [0] },
        { "name": "huge", "modules": ["./huge.js"], "parents": [0] }
      ],
      "entrypoints": [{ "name": "main", "chunks": [0] }]
    }),
    json!({ "optimizations": [{ "type": "min-chunk-size", "minChunkSize": 1000 }] }),
  );

  // The two tiny chunks merge first, then the result absorbs the huge one.
  let names = graph
    .chunks
    .iter()
    .map(|chunk| graph.chunk_table[*chunk].name.as_deref().unwrap_or_default())
    .collect::<Vec<_>>();
  assert_eq!(names, ["main", "tiny-a"]);
  assert_eq!(graph.chunk_table[graph.chunks[1]].modules.len(), 3);
  // Nothing below the threshold survives on its own.
  for chunk in &graph.chunks {
    let size: u64 = graph.chunk_table[*chunk]
      .modules
      .iter()
      .map(|module| graph.module_table[*module].size())
      .sum();
    assert!(size >= 1000, "{} is too small", graph.describe_chunk(*chunk));
  }
}

#[test]
fn optimizing_is_deterministic() {
  let options = json!({
    "optimizations": [
      { "type": "merge-duplicate-chunks" },
      { "type": "remove-empty-chunks" },
      { "type": "commons-chunk", "name": "vendor", "minChunks": 2 },
      { "type": "occurrence-order", "preferEntry": true }
    ]
  });
  let (first, _) = optimize(two_entries_sharing_react(), options.clone());
  let (second, _) = optimize(two_entries_sharing_react(), options);

  assert_eq!(
    serde_json::to_value(first.to_snapshot()).unwrap(),
    serde_json::to_value(second.to_snapshot()).unwrap()
  );
}

#[test]
fn malformed_options_fail_before_optimizing() {
  let options: OptimizeOptions = serde_json::from_value(json!({
    "optimizations": [
      { "type": "commons-chunk", "name": "vendor", "names": ["vendor", "manifest"] },
      { "type": "min-chunk-size" }
    ]
  }))
  .unwrap();

  let Err(errors) = Optimizer::new(options) else {
    panic!("expected invalid options to be rejected");
  };
  assert_eq!(errors.len(), 1);
  assert_eq!(
    errors[0].to_string(),
    "Invalid options for MinChunkSizeOptions: `minChunkSize` is required"
  );
}
