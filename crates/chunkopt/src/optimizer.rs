use std::sync::Arc;

use chunkopt_common::OptimizeOptions;
use chunkopt_error::BuildResult;
use tracing::instrument;

use crate::{
  chunk_graph::ChunkGraph,
  stages::optimize::{OptimizeStage, OptimizeStageOutput},
  types::{SharedOptions, optimize_output::OptimizeOutput},
  utils::normalize_options::normalize_options,
};

pub struct Optimizer {
  pub(crate) options: SharedOptions,
}

impl Optimizer {
  /// Fails on malformed options, before any graph is touched.
  pub fn new(options: OptimizeOptions) -> BuildResult<Self> {
    let options = normalize_options(options)?;
    Ok(Self { options: Arc::new(options) })
  }

  /// Runs every configured optimization on `graph` until it settles, then orders and numbers its
  /// modules and chunks.
  ///
  /// Problems with single optimizations end up in the output. An `Err` means the graph is broken
  /// and must not be used further.
  #[instrument(level = "debug", skip_all, fields(chunks = graph.chunks.len()))]
  pub fn optimize(&self, graph: &mut ChunkGraph) -> BuildResult<OptimizeOutput> {
    let OptimizeStageOutput { warnings, errors, iterations } =
      OptimizeStage::new(graph, &self.options).optimize()?;
    Ok(OptimizeOutput { warnings, errors, iterations })
  }
}
