mod chunk;
mod module;
mod optimize_options;
mod types;

pub use crate::{
  chunk::{Chunk, chunk_table::ChunkTable},
  module::{
    Module, ModuleKind, concatenated_module::ConcatenatedModule, external_module::ExternalModule,
    module_table::ModuleTable, normal_module::NormalModule,
  },
  optimize_options::{
    OptimizationOptions, OptimizeOptions,
    commons_chunk::{AsyncCommons, CommonsChunkOptions, MinChunks, MinChunksPredicate},
    limit_chunk_count::LimitChunkCountOptions,
    min_chunk_size::MinChunkSizeOptions,
    normalized_optimize_options::{
      CommonsChunkSelection, NormalizedCommonsChunkOptions, NormalizedLimitChunkCountOptions,
      NormalizedMinChunkSizeOptions, NormalizedOptimization, NormalizedOptimizeOptions,
    },
    occurrence_order::OccurrenceOrderOptions,
    optimize_phase::OptimizePhase,
    size_options::SizeOptions,
  },
  types::{
    block::Block,
    entrypoint::Entrypoint,
    origin::Origin,
    raw_idx::{BlockIdx, ChunkIdx, EntrypointIdx, ModuleIdx},
    reason::Reason,
    source_location::SourceLocation,
  },
};
