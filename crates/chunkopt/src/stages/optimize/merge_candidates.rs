use arcstr::ArcStr;
use chunkopt_common::{ChunkIdx, SizeOptions};

use super::OptimizeStage;

/// `chunk` would integrate `other`, saving `gain` bytes of estimated size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MergeCandidate {
  pub chunk: ChunkIdx,
  pub other: ChunkIdx,
  pub gain: i128,
  pub integrated_size: u64,
}

impl MergeCandidate {
  /// Larger gain wins, then the smaller result.
  fn is_better_than(&self, other: &Self) -> bool {
    self.gain > other.gain
      || (self.gain == other.gain && self.integrated_size < other.integrated_size)
  }
}

impl OptimizeStage<'_> {
  /// The best feasible merge among the pairs of `chunks` accepted by `filter`.
  ///
  /// Pairs are visited as (earlier, later), later chunks in the outer loop. The earlier chunk of a
  /// pair is the one that integrates the other. Among equally good pairs the first visited wins.
  pub(super) fn best_merge_candidate(
    &self,
    chunks: &[ChunkIdx],
    size: &SizeOptions,
    filter: impl Fn(ChunkIdx, ChunkIdx) -> bool,
  ) -> Option<MergeCandidate> {
    let sizes =
      chunks.iter().map(|chunk| self.graph.chunk_size(*chunk, size)).collect::<Vec<_>>();

    let mut best: Option<MergeCandidate> = None;
    for (other_idx, other) in chunks.iter().copied().enumerate() {
      for (chunk_idx, chunk) in chunks[..other_idx].iter().copied().enumerate() {
        if !filter(chunk, other) {
          continue;
        }
        let Some(integrated_size) = self.graph.integrated_size(chunk, other, size) else {
          continue;
        };
        let candidate = MergeCandidate {
          chunk,
          other,
          gain: i128::from(sizes[chunk_idx]) + i128::from(sizes[other_idx])
            - i128::from(integrated_size),
          integrated_size,
        };
        match &best {
          Some(best) if !candidate.is_better_than(best) => {}
          _ => best = Some(candidate),
        }
      }
    }
    best
  }

  /// Integrates the candidate and drops the absorbed chunk from `chunks`.
  pub(super) fn apply_merge_candidate(
    &mut self,
    candidate: MergeCandidate,
    reason: &ArcStr,
    chunks: &mut Vec<ChunkIdx>,
  ) -> bool {
    if !self.graph.integrate(candidate.chunk, candidate.other, reason) {
      return false;
    }
    chunks.retain(|chunk| *chunk != candidate.other);
    true
  }
}
