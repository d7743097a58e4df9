mod assign_ids;
mod commons_chunk;
mod limit_chunk_count;
mod merge_candidates;
mod merge_duplicate_chunks;
mod min_chunk_size;
mod occurrence_order;
mod remove_empty_chunks;

use std::mem;

use chunkopt_common::{ChunkIdx, NormalizedOptimization, NormalizedOptimizeOptions, OptimizePhase};
use chunkopt_error::BuildResult;
use rustc_hash::FxHashSet;
use tracing::{debug, debug_span};

use crate::chunk_graph::ChunkGraph;

#[derive(Debug)]
pub struct OptimizeStageOutput {
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
  /// Rounds of the chunk phases it took to reach a fixed point.
  pub iterations: usize,
}

/// Runs the configured optimizations over one graph, phase by phase.
#[derive(Debug)]
pub struct OptimizeStage<'a> {
  pub graph: &'a mut ChunkGraph,
  pub options: &'a NormalizedOptimizeOptions,
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
  /// Commons extractions that already ran, by position in `options.optimizations`.
  finished_commons: FxHashSet<usize>,
}

impl<'a> OptimizeStage<'a> {
  pub fn new(graph: &'a mut ChunkGraph, options: &'a NormalizedOptimizeOptions) -> Self {
    Self {
      graph,
      options,
      warnings: Vec::new(),
      errors: Vec::new(),
      finished_commons: FxHashSet::default(),
    }
  }

  pub fn optimize(mut self) -> BuildResult<OptimizeStageOutput> {
    let mut iterations = 0;
    loop {
      if iterations == self.options.max_iterations {
        self.warnings.push(anyhow::anyhow!(
          "Chunk optimizations didn't settle after {iterations} iterations"
        ));
        break;
      }
      iterations += 1;
      if !(self.run_phase(OptimizePhase::OptimizeChunksBasic)?
        || self.run_phase(OptimizePhase::OptimizeChunks)?
        || self.run_phase(OptimizePhase::OptimizeChunksAdvanced)?)
      {
        break;
      }
    }
    debug!("Chunk phases settled after {iterations} iteration(s)");

    let mut extracted_iterations = 0;
    while extracted_iterations < self.options.max_iterations
      && (self.run_phase(OptimizePhase::OptimizeExtractedChunksBasic)?
        || self.run_phase(OptimizePhase::OptimizeExtractedChunks)?)
    {
      extracted_iterations += 1;
    }

    self.run_phase(OptimizePhase::OptimizeModuleOrder)?;
    self.run_phase(OptimizePhase::OptimizeChunkOrder)?;
    self.assign_ids();

    Ok(OptimizeStageOutput { warnings: self.warnings, errors: self.errors, iterations })
  }

  /// Runs the optimizations bound to `phase` in registration order. The first one that reports a
  /// change ends the phase.
  pub fn run_phase(&mut self, phase: OptimizePhase) -> BuildResult<bool> {
    let span = debug_span!("phase", name = phase.as_str());
    let _guard = span.enter();

    let mut chunks = mem::take(self.chunk_list(phase));
    let changed = self.run_optimizations(phase, &mut chunks);
    *self.chunk_list(phase) = chunks;
    let changed = changed?;

    if self.options.check_constraints {
      self.graph.check_constraints()?;
    }
    Ok(changed)
  }

  fn chunk_list(&mut self, phase: OptimizePhase) -> &mut Vec<ChunkIdx> {
    if phase.is_extracted() { &mut self.graph.extracted_chunks } else { &mut self.graph.chunks }
  }

  fn run_optimizations(
    &mut self,
    phase: OptimizePhase,
    chunks: &mut Vec<ChunkIdx>,
  ) -> BuildResult<bool> {
    let options = self.options;
    for (idx, optimization) in options.optimizations.iter().enumerate() {
      if !optimization.phases().contains(&phase) {
        continue;
      }
      let changed = match optimization {
        NormalizedOptimization::MergeDuplicateChunks => self.merge_duplicate_chunks(chunks),
        NormalizedOptimization::RemoveEmptyChunks => self.remove_empty_chunks(chunks),
        NormalizedOptimization::CommonsChunk(commons) => {
          if self.finished_commons.insert(idx) {
            self.extract_commons_chunks(commons, chunks)?
          } else {
            false
          }
        }
        NormalizedOptimization::LimitChunkCount(limit) => self.limit_chunk_count(limit, chunks),
        NormalizedOptimization::MinChunkSize(min_size) => self.merge_small_chunks(min_size, chunks),
        NormalizedOptimization::OccurrenceOrder { prefer_entry } => {
          if phase == OptimizePhase::OptimizeModuleOrder {
            self.sort_modules_by_occurrence(*prefer_entry, chunks);
          } else {
            self.sort_chunks_by_occurrence(chunks);
          }
          false
        }
      };
      if changed {
        debug!("{} changed the graph in {phase}", optimization.name());
        return Ok(true);
      }
    }
    Ok(false)
  }
}
