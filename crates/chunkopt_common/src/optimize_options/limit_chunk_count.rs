use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitChunkCountOptions {
  pub max_chunks: Option<usize>,
  /// Extra cost of every chunk in bytes, reflecting request delay. Defaults to 10000.
  pub chunk_overhead: Option<u64>,
  /// Entry chunks are merged this many times less likely. Defaults to 10.
  pub entry_chunk_multiplicator: Option<u64>,
}
