use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinChunkSizeOptions {
  /// Chunks smaller than this get merged. Required.
  pub min_chunk_size: Option<u64>,
  pub chunk_overhead: Option<u64>,
  pub entry_chunk_multiplicator: Option<u64>,
}
