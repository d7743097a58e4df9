use std::ops::{Deref, DerefMut};

use oxc_index::IndexVec;

use crate::ChunkIdx;

use super::Chunk;

/// Every chunk ever created in a session, removed ones included. Which chunks are still part of
/// the output is tracked by the chunk lists handed to the optimizations.
#[derive(Debug, Default)]
pub struct ChunkTable {
  pub chunks: IndexVec<ChunkIdx, Chunk>,
}

impl Deref for ChunkTable {
  type Target = IndexVec<ChunkIdx, Chunk>;

  fn deref(&self) -> &Self::Target {
    &self.chunks
  }
}

impl DerefMut for ChunkTable {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.chunks
  }
}
