use chunkopt_common::{ChunkIdx, NormalizedLimitChunkCountOptions};
use tracing::trace;

use super::OptimizeStage;

impl OptimizeStage<'_> {
  /// Performs the single most profitable merge while there are more than `max_chunks` chunks.
  pub(super) fn limit_chunk_count(
    &mut self,
    options: &NormalizedLimitChunkCountOptions,
    chunks: &mut Vec<ChunkIdx>,
  ) -> bool {
    let Some(max_chunks) = options.max_chunks.filter(|max_chunks| *max_chunks >= 1) else {
      return false;
    };
    if chunks.len() <= max_chunks {
      return false;
    }
    let Some(candidate) = self.best_merge_candidate(chunks, &options.size, |_, _| true) else {
      trace!("{} chunks left but none of them can be merged", chunks.len());
      return false;
    };
    self.apply_merge_candidate(candidate, &arcstr::literal!("limit"), chunks)
  }
}
