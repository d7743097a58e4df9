use chunkopt::{ChunkGraph, GraphSnapshot, ModuleKind};
use serde_json::json;

#[test]
fn snapshot_survives_a_round_trip() {
  let graph = json!({
    "modules": [
      { "request": "./index.js", "resource": "/src/index.js", "size": 100, "id": 4 },
      { "request": "react", "type": "external", "size": 42 },
      {
        "request": "./a.js",
        "type": "concatenated",
        "size": 42,
        "modules": [
          { "identifier": "./a.js", "size": 30 },
          { "identifier": "./b.js", "size": 12 }
        ],
        "reasons": [{ "module": "./index.js", "dependency": "import('./a')", "chunks": [1] }]
      }
    ],
    "chunks": [
      {
        "name": "main",
        "modules": ["./index.js", "external \"react\""],
        "entryModule": "./index.js",
        "origins": [{ "name": "main", "reasons": ["entry"] }]
      },
      {
        "modules": ["./a.js ./b.js"],
        "parents": [0],
        "origins": [{ "module": "./index.js", "loc": { "line": 3, "column": 8 } }],
        "filenameTemplate": "[name].lazy.js"
      }
    ],
    "extractedChunks": [{ "name": "styles", "modules": [], "parents": [0] }],
    "blocks": [{ "module": "./index.js", "loc": { "line": 3, "column": 8 }, "chunks": [1] }],
    "entrypoints": [{ "name": "main", "chunks": [0] }]
  });

  let snapshot: GraphSnapshot = serde_json::from_value(graph.clone()).unwrap();
  let loaded = ChunkGraph::from_snapshot(&snapshot).unwrap();
  loaded.check_constraints().unwrap();

  assert_eq!(loaded.chunks.len(), 2);
  assert_eq!(loaded.extracted_chunks.len(), 1);
  let concatenated = loaded.sorted_modules[2];
  assert!(matches!(loaded.module_table[concatenated].kind, ModuleKind::Concatenated(_)));
  assert_eq!(loaded.module_table[concatenated].size(), 42);
  assert_eq!(loaded.module_table[loaded.sorted_modules[1]].identifier(), "external \"react\"");
  assert!(loaded.has_runtime(loaded.chunks[0]));

  assert_eq!(serde_json::to_value(loaded.to_snapshot()).unwrap(), graph);
}

#[test]
fn dangling_references_are_all_reported() {
  let snapshot: GraphSnapshot = serde_json::from_value(json!({
    "modules": [{ "request": "./index.js", "size": 1 }],
    "chunks": [{ "name": "main", "modules": ["./index.js", "./missing.js"], "parents": [7] }],
    "entrypoints": [{ "name": "main", "chunks": [0] }]
  }))
  .unwrap();

  let Err(errors) = ChunkGraph::from_snapshot(&snapshot) else {
    panic!("expected dangling references to be rejected");
  };
  let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();
  assert_eq!(
    messages,
    [
      "Snapshot references unknown module \"./missing.js\"",
      "Snapshot references unknown chunk #7",
    ]
  );
}
