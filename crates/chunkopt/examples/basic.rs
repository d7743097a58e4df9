//! Two entries sharing a library, split into a `vendor` commons chunk.

use chunkopt::{ChunkGraph, GraphSnapshot, OptimizeOptions, Optimizer};

const GRAPH: &str = r#"{
  "modules": [
    { "request": "./app.js", "size": 1200 },
    { "request": "./admin.js", "size": 900 },
    { "request": "./node_modules/react.js", "size": 6400 },
    { "request": "./lazy.js", "size": 300 }
  ],
  "chunks": [
    { "name": "app", "modules": ["./app.js", "./node_modules/react.js"], "entryModule": "./app.js" },
    { "name": "admin", "modules": ["./admin.js", "./node_modules/react.js"], "entryModule": "./admin.js" },
    { "modules": ["./lazy.js", "./node_modules/react.js"], "parents": [0] }
  ],
  "blocks": [{ "module": "./app.js", "chunks": [2] }],
  "entrypoints": [{ "name": "app", "chunks": [0] }, { "name": "admin", "chunks": [1] }]
}"#;

const OPTIONS: &str = r#"{
  "optimizations": [
    { "type": "merge-duplicate-chunks" },
    { "type": "remove-empty-chunks" },
    { "type": "commons-chunk", "name": "vendor", "minChunks": 2 },
    { "type": "occurrence-order", "preferEntry": true }
  ]
}"#;

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
  let snapshot: GraphSnapshot = serde_json::from_str(GRAPH)?;
  let options: OptimizeOptions = serde_json::from_str(OPTIONS)?;

  let optimizer = Optimizer::new(options).map_err(|errors| anyhow::anyhow!("{errors}"))?;
  let mut graph =
    ChunkGraph::from_snapshot(&snapshot).map_err(|errors| anyhow::anyhow!("{errors}"))?;
  let output = optimizer.optimize(&mut graph).map_err(|errors| anyhow::anyhow!("{errors}"))?;

  println!("settled after {} iterations", output.iterations);
  println!("{}", serde_json::to_string_pretty(&graph.to_snapshot())?);
  Ok(())
}
