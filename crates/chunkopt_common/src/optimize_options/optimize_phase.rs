use std::fmt::Display;

/// Named points of the optimization pipeline an optimization can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptimizePhase {
  /// Cheap merges and removals.
  OptimizeChunksBasic,
  OptimizeExtractedChunksBasic,
  /// Commons extraction.
  OptimizeChunks,
  OptimizeExtractedChunks,
  /// Size driven merges.
  OptimizeChunksAdvanced,
  OptimizeModuleOrder,
  OptimizeChunkOrder,
}

impl OptimizePhase {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::OptimizeChunksBasic => "optimize-chunks-basic",
      Self::OptimizeExtractedChunksBasic => "optimize-extracted-chunks-basic",
      Self::OptimizeChunks => "optimize-chunks",
      Self::OptimizeExtractedChunks => "optimize-extracted-chunks",
      Self::OptimizeChunksAdvanced => "optimize-chunks-advanced",
      Self::OptimizeModuleOrder => "optimize-module-order",
      Self::OptimizeChunkOrder => "optimize-chunk-order",
    }
  }

  pub fn is_extracted(self) -> bool {
    matches!(self, Self::OptimizeExtractedChunksBasic | Self::OptimizeExtractedChunks)
  }
}

impl Display for OptimizePhase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
