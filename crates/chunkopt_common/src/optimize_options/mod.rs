pub mod commons_chunk;
pub mod limit_chunk_count;
pub mod min_chunk_size;
pub mod normalized_optimize_options;
pub mod occurrence_order;
pub mod optimize_phase;
pub mod size_options;

use serde::Deserialize;

use crate::{CommonsChunkOptions, LimitChunkCountOptions, MinChunkSizeOptions, OccurrenceOrderOptions};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeOptions {
  /// Run in this order when several are bound to the same phase.
  #[serde(default)]
  pub optimizations: Vec<OptimizationOptions>,
  /// How often the chunk phases may be re-run before giving up on a fixed point.
  pub max_iterations: Option<usize>,
  /// Run the consistency checker after every phase.
  pub check_constraints: Option<bool>,
  /// Assign numeric ids in the computed order.
  pub record_ids: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OptimizationOptions {
  MergeDuplicateChunks,
  RemoveEmptyChunks,
  CommonsChunk(CommonsChunkOptions),
  LimitChunkCount(LimitChunkCountOptions),
  MinChunkSize(MinChunkSizeOptions),
  OccurrenceOrder(OccurrenceOrderOptions),
}

#[test]
fn test_deserialize_optimize_options() {
  let options: OptimizeOptions = serde_json::from_str(
    r#"{
      "maxIterations": 20,
      "optimizations": [
        { "type": "remove-empty-chunks" },
        { "type": "commons-chunk", "name": "vendor", "minChunks": 2 },
        { "type": "limit-chunk-count", "maxChunks": 3, "chunkOverhead": 0 }
      ]
    }"#,
  )
  .unwrap();

  assert_eq!(options.max_iterations, Some(20));
  assert_eq!(options.optimizations.len(), 3);
  assert!(matches!(options.optimizations[0], OptimizationOptions::RemoveEmptyChunks));
  let OptimizationOptions::CommonsChunk(commons) = &options.optimizations[1] else {
    panic!("expected commons chunk options");
  };
  assert_eq!(commons.name.as_deref(), Some("vendor"));
  assert!(matches!(commons.min_chunks, Some(crate::MinChunks::Count(2))));
  let OptimizationOptions::LimitChunkCount(limit) = &options.optimizations[2] else {
    panic!("expected limit chunk count options");
  };
  assert_eq!(limit.max_chunks, Some(3));
  assert_eq!(limit.chunk_overhead, Some(0));
}
