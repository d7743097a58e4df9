use std::{cmp::Ordering, mem};

use arcstr::ArcStr;
use chunkopt_common::{ChunkIdx, ModuleIdx};
use chunkopt_utils::indexmap::FxIndexMap;

use super::ChunkGraph;

impl ChunkGraph {
  /// Unassigned ids sort first.
  fn compare_modules_by_id(&self, a: ModuleIdx, b: ModuleIdx) -> Ordering {
    let (a, b) = (&self.module_table[a], &self.module_table[b]);
    a.id.cmp(&b.id).then_with(|| a.identifier().cmp(b.identifier()))
  }

  fn compare_chunks_by_id(&self, a: ChunkIdx, b: ChunkIdx) -> Ordering {
    self.chunk_table[a].id.cmp(&self.chunk_table[b].id)
  }

  /// Puts the lists of `chunk` into id order so rendering doesn't depend on graph history.
  pub fn sort_chunk_items(&mut self, chunk: ChunkIdx) {
    let mut modules = mem::take(&mut self.chunk_table[chunk].modules);
    let mut origins = mem::take(&mut self.chunk_table[chunk].origins);
    let mut parents = mem::take(&mut self.chunk_table[chunk].parents);
    let mut children = mem::take(&mut self.chunk_table[chunk].children);

    modules.sort_by(|a, b| self.compare_modules_by_id(*a, *b));
    origins.sort_by(|a, b| {
      let identifier = |module: Option<ModuleIdx>| module.map(|m| self.identifier(m));
      identifier(a.module).cmp(&identifier(b.module)).then_with(|| a.loc.cmp(&b.loc))
    });
    for origin in &mut origins {
      origin.reasons.sort();
    }
    parents.sort_by(|a, b| self.compare_chunks_by_id(*a, *b));
    children.sort_by(|a, b| self.compare_chunks_by_id(*a, *b));

    let chunk = &mut self.chunk_table[chunk];
    chunk.modules = modules;
    chunk.origins = origins;
    chunk.parents = parents;
    chunk.children = children;
  }

  pub fn sort_module_items(&mut self, module: ModuleIdx) {
    let mut chunks = mem::take(&mut self.module_table[module].chunks);
    let mut reasons = mem::take(&mut self.module_table[module].reasons);

    chunks.sort_by(|a, b| self.compare_chunks_by_id(*a, *b));
    reasons.sort_by_key(|reason| reason.module.and_then(|m| self.module_table[m].id));

    let module = &mut self.module_table[module];
    module.chunks = chunks;
    module.reasons = reasons;
  }

  /// Names of the chunks reachable from `chunk`, itself included, keyed by chunk id. Chunks
  /// carrying a runtime are left out unless `include_entries` is set.
  pub fn chunk_name_map(&self, chunk: ChunkIdx, include_entries: bool) -> FxIndexMap<u32, ArcStr> {
    let mut visited = Vec::new();
    let mut stack = vec![chunk];
    let mut names = FxIndexMap::default();
    while let Some(current) = stack.pop() {
      if visited.contains(&current) {
        continue;
      }
      visited.push(current);
      let current_chunk = &self.chunk_table[current];
      if include_entries || !self.has_runtime(current) {
        if let (Some(id), Some(name)) = (current_chunk.id, &current_chunk.name) {
          names.insert(id, name.clone());
        }
      }
      stack.extend(current_chunk.children.iter().rev());
    }
    names
  }
}
