/// Parameters of the chunk size estimate used to rank merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeOptions {
  pub chunk_overhead: u64,
  pub entry_chunk_multiplicator: u64,
}

impl SizeOptions {
  pub const DEFAULT_CHUNK_OVERHEAD: u64 = 10000;
  pub const DEFAULT_ENTRY_CHUNK_MULTIPLICATOR: u64 = 10;

  /// Plain module byte sums: no request cost and no penalty for entry chunks.
  pub const NEUTRAL: Self = Self { chunk_overhead: 1, entry_chunk_multiplicator: 1 };

  /// An overhead of `0` is respected, a multiplicator of `0` falls back to the default.
  pub fn new(chunk_overhead: Option<u64>, entry_chunk_multiplicator: Option<u64>) -> Self {
    Self {
      chunk_overhead: chunk_overhead.unwrap_or(Self::DEFAULT_CHUNK_OVERHEAD),
      entry_chunk_multiplicator: entry_chunk_multiplicator
        .filter(|multiplicator| *multiplicator != 0)
        .unwrap_or(Self::DEFAULT_ENTRY_CHUNK_MULTIPLICATOR),
    }
  }
}

impl Default for SizeOptions {
  fn default() -> Self {
    Self::new(None, None)
  }
}

#[test]
fn test_size_options_defaults() {
  assert_eq!(SizeOptions::default(), SizeOptions { chunk_overhead: 10000, entry_chunk_multiplicator: 10 });
  assert_eq!(SizeOptions::new(Some(0), Some(0)), SizeOptions { chunk_overhead: 0, entry_chunk_multiplicator: 10 });
}
