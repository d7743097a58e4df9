use chunkopt_common::ChunkIdx;
use chunkopt_error::ConstraintViolation;

use super::ChunkGraph;

impl ChunkGraph {
  /// Verifies that every chunk relation is stored on both ends exactly once and that no chunk
  /// references itself. Returns the first violation found.
  pub fn check_constraints(&self) -> Result<(), ConstraintViolation> {
    for chunk in &self.chunk_table.chunks {
      let debug_id = |idx: ChunkIdx| self.chunk_table[idx].debug_id;

      for (i, child) in chunk.children.iter().enumerate() {
        if *child == chunk.idx {
          return Err(ConstraintViolation::SelfReference { chunk: chunk.debug_id });
        }
        if chunk.children[..i].contains(child) {
          return Err(ConstraintViolation::DuplicateChild {
            chunk: chunk.debug_id,
            child: debug_id(*child),
          });
        }
        if !self.chunk_table[*child].parents.contains(&chunk.idx) {
          return Err(ConstraintViolation::ChildMissingParent {
            chunk: chunk.debug_id,
            child: debug_id(*child),
          });
        }
      }

      for (i, parent) in chunk.parents.iter().enumerate() {
        if *parent == chunk.idx {
          return Err(ConstraintViolation::SelfReference { chunk: chunk.debug_id });
        }
        if chunk.parents[..i].contains(parent) {
          return Err(ConstraintViolation::DuplicateParent {
            chunk: chunk.debug_id,
            parent: debug_id(*parent),
          });
        }
        if !self.chunk_table[*parent].children.contains(&chunk.idx) {
          return Err(ConstraintViolation::ParentMissingChild {
            chunk: chunk.debug_id,
            parent: debug_id(*parent),
          });
        }
      }

      for module in &chunk.modules {
        if !self.module_table[*module].is_in_chunk(chunk.idx) {
          return Err(ConstraintViolation::ModuleMissingChunk {
            chunk: chunk.debug_id,
            module: self.module_table[*module].to_string(),
          });
        }
      }
    }

    for module in &self.module_table.modules {
      for chunk in &module.chunks {
        if !self.chunk_table[*chunk].has_module(module.idx) {
          return Err(ConstraintViolation::ChunkMissingModule {
            chunk: self.chunk_table[*chunk].debug_id,
            module: module.to_string(),
          });
        }
      }
    }

    Ok(())
  }
}

#[test]
fn test_check_constraints_reports_broken_relations() {
  use super::test_utils::module;

  let mut graph = ChunkGraph::new();
  let a = graph.create_chunk(None);
  let b = graph.create_chunk(None);
  assert_eq!(graph.check_constraints(), Ok(()));

  graph.chunk_table[a].children.push(b);
  assert_eq!(
    graph.check_constraints(),
    Err(ConstraintViolation::ChildMissingParent { chunk: 1000, child: 1001 })
  );

  graph.chunk_table[b].parents.push(a);
  graph.chunk_table[a].children.push(b);
  assert_eq!(
    graph.check_constraints(),
    Err(ConstraintViolation::DuplicateChild { chunk: 1000, child: 1001 })
  );

  graph.chunk_table[a].children.pop();
  graph.chunk_table[b].parents.push(b);
  assert_eq!(graph.check_constraints(), Err(ConstraintViolation::SelfReference { chunk: 1001 }));

  graph.chunk_table[b].parents.pop();
  let m = module(&mut graph, "./a.js", 1);
  graph.module_table[m].chunks.push(b);
  assert_eq!(
    graph.check_constraints(),
    Err(ConstraintViolation::ChunkMissingModule { chunk: 1001, module: "Module[1000]".to_string() })
  );
}
