use std::cmp;

use arcstr::ArcStr;
use chunkopt_common::{
  ChunkIdx, CommonsChunkSelection, MinChunks, ModuleIdx, NormalizedCommonsChunkOptions,
};
use chunkopt_error::BuildResult;
use chunkopt_utils::indexmap::FxIndexMap;
use tracing::debug;

use super::OptimizeStage;
use crate::chunk_graph::push_unique;

impl OptimizeStage<'_> {
  /// Moves modules shared by several chunks into commons chunks. Every commons chunk is handled
  /// in turn, so later ones can extract from earlier ones.
  pub(super) fn extract_commons_chunks(
    &mut self,
    options: &NormalizedCommonsChunkOptions,
    chunks: &mut Vec<ChunkIdx>,
  ) -> BuildResult<bool> {
    let targets = match &options.chunk_names {
      None => chunks.clone(),
      Some(names) => {
        names.iter().map(|name| self.graph.find_or_create_chunk(chunks, Some(name))).collect()
      }
    };
    for target_idx in 0..targets.len() {
      self.extract_commons_chunk(options, &targets, target_idx, chunks)?;
    }
    Ok(true)
  }

  fn extract_commons_chunk(
    &mut self,
    options: &NormalizedCommonsChunkOptions,
    targets: &[ChunkIdx],
    target_idx: usize,
    chunks: &mut Vec<ChunkIdx>,
  ) -> BuildResult<()> {
    let target = targets[target_idx];
    let is_async = options.async_commons.is_enabled();

    let candidates = match &options.selection {
      CommonsChunkSelection::Names(names) => chunks
        .iter()
        .copied()
        .filter(|chunk| {
          *chunk != target
            && self.graph.chunk_table[*chunk].name.as_ref().is_some_and(|name| names.contains(name))
        })
        .collect::<Vec<_>>(),
      CommonsChunkSelection::Children => self.graph.chunk_table[target]
        .children
        .iter()
        .copied()
        .filter(|child| is_async || self.graph.chunk_table[*child].parents.len() == 1)
        .collect(),
      CommonsChunkSelection::EntryChunks => {
        if !self.graph.chunk_table[target].parents.is_empty() {
          self.errors.push(anyhow::anyhow!(
            "CommonsChunkPlugin: While running in normal mode it's not allowed to use a non-entry chunk ({})",
            self.graph.chunk_table[target].name.as_deref().unwrap_or_default()
          ));
          return Ok(());
        }
        chunks
          .iter()
          .copied()
          .filter(|chunk| {
            let is_later_target = targets
              .iter()
              .position(|target| target == chunk)
              .is_some_and(|found| found >= target_idx);
            !is_later_target && self.graph.has_runtime(*chunk)
          })
          .collect()
      }
    };

    let commons_chunk = if is_async {
      let async_chunk = self.graph.find_or_create_chunk(chunks, options.async_commons.name());
      let chunk = &mut self.graph.chunk_table[async_chunk];
      chunk.chunk_reason = Some(arcstr::literal!("async commons chunk"));
      chunk.extra_async = true;
      self.graph.connect_chunks(target, async_chunk);
      async_chunk
    } else {
      target
    };

    let modules = self.select_common_modules(options, &candidates, commons_chunk);
    if let Some(min_size) = options.min_size.filter(|min_size| *min_size > 0) {
      let size: u64 = modules.iter().map(|module| self.graph.module_table[*module].size()).sum();
      if size < min_size {
        debug!(
          "Skipping commons chunk {}: {size} bytes is below {min_size}",
          self.describe(target)
        );
        return Ok(());
      }
    }

    let mut affected_chunks = Vec::new();
    for module in &modules {
      for candidate in &candidates {
        if self.graph.remove_module_from_chunk(*candidate, *module) {
          push_unique(&mut affected_chunks, *candidate);
        }
      }
      self.graph.add_module_to_chunk(commons_chunk, *module);
    }
    debug!(
      "Moved {} module(s) out of {} chunk(s) into {}",
      modules.len(),
      affected_chunks.len(),
      self.describe(commons_chunk)
    );

    if is_async {
      self.attach_async_commons_chunk(commons_chunk, &affected_chunks);
    } else {
      for candidate in candidates {
        for parent in self.graph.chunk_table[candidate].parents.clone() {
          self.graph.disconnect_chunks(parent, candidate);
        }
        for entrypoint in self.graph.chunk_table[candidate].entrypoints.clone() {
          self.graph.insert_chunk_into_entrypoint(entrypoint, commons_chunk, candidate)?;
        }
        self.graph.connect_chunks(commons_chunk, candidate);
      }
    }

    if let Some(filename_template) = &options.filename_template {
      self.graph.chunk_table[commons_chunk].filename_template = Some(filename_template.clone());
    }
    Ok(())
  }

  /// Modules of `candidates` that occur often enough and accept `commons_chunk`.
  fn select_common_modules(
    &self,
    options: &NormalizedCommonsChunkOptions,
    candidates: &[ChunkIdx],
    commons_chunk: ChunkIdx,
  ) -> Vec<ModuleIdx> {
    if matches!(options.min_chunks, Some(MinChunks::Infinity)) {
      return Vec::new();
    }

    let mut occurrences: FxIndexMap<ModuleIdx, usize> = FxIndexMap::default();
    for candidate in candidates {
      for module in &self.graph.chunk_table[*candidate].modules {
        *occurrences.entry(*module).or_default() += 1;
      }
    }

    let default_min_chunks = cmp::max(2, candidates.len());
    let commons_chunk = &self.graph.chunk_table[commons_chunk];
    occurrences
      .into_iter()
      .filter(|(module, count)| match &options.min_chunks {
        None => *count >= default_min_chunks,
        Some(MinChunks::Count(min_chunks)) => count >= min_chunks,
        Some(MinChunks::Infinity) => false,
        Some(MinChunks::Predicate(predicate)) => {
          predicate(&self.graph.module_table[*module], *count)
        }
      })
      .map(|(module, _)| module)
      .filter(|module| self.graph.module_table[*module].kind.chunk_condition(commons_chunk))
      .collect()
  }

  /// Makes the async commons chunk load together with every lazy chunk it took modules from.
  fn attach_async_commons_chunk(&mut self, commons_chunk: ChunkIdx, affected_chunks: &[ChunkIdx]) {
    let reason: ArcStr = arcstr::literal!("async commons");
    for chunk in affected_chunks {
      if self.graph.chunk_table[*chunk].is_initial() {
        continue;
      }
      let blocks = self.graph.chunk_table[*chunk].blocks.iter().copied().collect::<Vec<_>>();
      for block in blocks {
        self.graph.prepend_block_chunk(commons_chunk, block);
      }
    }

    let origins = affected_chunks
      .iter()
      .flat_map(|chunk| self.graph.chunk_table[*chunk].origins.iter().cloned())
      .map(|mut origin| {
        origin.reasons.push(reason.clone());
        origin
      })
      .collect::<Vec<_>>();
    self.graph.chunk_table[commons_chunk].origins.extend(origins);
  }

  fn describe(&self, chunk: ChunkIdx) -> String {
    match &self.graph.chunk_table[chunk].name {
      Some(name) => format!("chunk {name:?}"),
      None => format!("chunk {}", self.graph.chunk_table[chunk].debug_id),
    }
  }
}
