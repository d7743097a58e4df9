use arcstr::ArcStr;

use crate::{AsyncCommons, MinChunks, OptimizePhase, SizeOptions};

#[derive(Debug)]
pub struct NormalizedOptimizeOptions {
  pub optimizations: Vec<NormalizedOptimization>,
  pub max_iterations: usize,
  pub check_constraints: bool,
  pub record_ids: bool,
}

#[derive(Debug)]
pub enum NormalizedOptimization {
  MergeDuplicateChunks,
  RemoveEmptyChunks,
  CommonsChunk(NormalizedCommonsChunkOptions),
  LimitChunkCount(NormalizedLimitChunkCountOptions),
  MinChunkSize(NormalizedMinChunkSizeOptions),
  OccurrenceOrder { prefer_entry: bool },
}

impl NormalizedOptimization {
  pub fn name(&self) -> &'static str {
    match self {
      Self::MergeDuplicateChunks => "MergeDuplicateChunks",
      Self::RemoveEmptyChunks => "RemoveEmptyChunks",
      Self::CommonsChunk(_) => "CommonsChunk",
      Self::LimitChunkCount(_) => "LimitChunkCount",
      Self::MinChunkSize(_) => "MinChunkSize",
      Self::OccurrenceOrder { .. } => "OccurrenceOrder",
    }
  }

  pub fn phases(&self) -> &'static [OptimizePhase] {
    match self {
      Self::MergeDuplicateChunks => &[OptimizePhase::OptimizeChunksBasic],
      Self::RemoveEmptyChunks => {
        &[OptimizePhase::OptimizeChunksBasic, OptimizePhase::OptimizeExtractedChunksBasic]
      }
      Self::CommonsChunk(_) => {
        &[OptimizePhase::OptimizeChunks, OptimizePhase::OptimizeExtractedChunks]
      }
      Self::LimitChunkCount(_) | Self::MinChunkSize(_) => &[OptimizePhase::OptimizeChunksAdvanced],
      Self::OccurrenceOrder { .. } => {
        &[OptimizePhase::OptimizeModuleOrder, OptimizePhase::OptimizeChunkOrder]
      }
    }
  }
}

/// Where commons extraction looks for shared modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonsChunkSelection {
  /// Chunks with one of these names.
  Names(Vec<ArcStr>),
  /// Direct children of the commons chunk.
  Children,
  /// Runtime chunks that aren't commons chunks processed later.
  EntryChunks,
}

#[derive(Debug)]
pub struct NormalizedCommonsChunkOptions {
  /// `None` means every chunk of the list is a commons chunk.
  pub chunk_names: Option<Vec<ArcStr>>,
  pub filename_template: Option<ArcStr>,
  /// `None` requires a module to be in every candidate, and in at least two of them.
  pub min_chunks: Option<MinChunks>,
  pub selection: CommonsChunkSelection,
  pub async_commons: AsyncCommons,
  pub min_size: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizedLimitChunkCountOptions {
  /// `None` disables the optimization.
  pub max_chunks: Option<usize>,
  pub size: SizeOptions,
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizedMinChunkSizeOptions {
  pub min_chunk_size: u64,
  pub size: SizeOptions,
}
