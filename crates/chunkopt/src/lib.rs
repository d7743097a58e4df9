mod chunk_graph;
mod optimizer;
mod snapshot;
mod stages;
mod types;
mod utils;

pub use crate::{
  chunk_graph::ChunkGraph,
  optimizer::Optimizer,
  snapshot::{
    BlockSnapshot, ChunkSnapshot, EntrypointSnapshot, GraphSnapshot, InnerModuleSnapshot,
    ModuleSnapshot, ModuleType, OriginSnapshot, ReasonSnapshot,
  },
  types::optimize_output::OptimizeOutput,
};
pub use chunkopt_common::*;
pub use chunkopt_error::{BuildError, BuildResult, ConstraintViolation};
