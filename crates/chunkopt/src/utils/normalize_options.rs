use arcstr::ArcStr;
use chunkopt_common::{
  CommonsChunkOptions, CommonsChunkSelection, LimitChunkCountOptions, MinChunkSizeOptions,
  MinChunks, NormalizedCommonsChunkOptions, NormalizedLimitChunkCountOptions,
  NormalizedMinChunkSizeOptions, NormalizedOptimization, NormalizedOptimizeOptions,
  OptimizationOptions, OptimizeOptions, SizeOptions,
};
use chunkopt_error::BuildResult;
use chunkopt_utils::pretty_type_name::pretty_type_name;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

pub fn normalize_options(raw_options: OptimizeOptions) -> BuildResult<NormalizedOptimizeOptions> {
  let mut errors = Vec::new();
  let mut optimizations = Vec::with_capacity(raw_options.optimizations.len());

  for optimization in raw_options.optimizations {
    let normalized = match optimization {
      OptimizationOptions::MergeDuplicateChunks => Ok(NormalizedOptimization::MergeDuplicateChunks),
      OptimizationOptions::RemoveEmptyChunks => Ok(NormalizedOptimization::RemoveEmptyChunks),
      OptimizationOptions::CommonsChunk(options) => {
        normalize_commons_chunk(options).map(NormalizedOptimization::CommonsChunk)
      }
      OptimizationOptions::LimitChunkCount(options) => {
        Ok(NormalizedOptimization::LimitChunkCount(normalize_limit_chunk_count(&options)))
      }
      OptimizationOptions::MinChunkSize(options) => {
        normalize_min_chunk_size(&options).map(NormalizedOptimization::MinChunkSize)
      }
      OptimizationOptions::OccurrenceOrder(options) => {
        Ok(NormalizedOptimization::OccurrenceOrder {
          prefer_entry: options.prefer_entry.unwrap_or(false),
        })
      }
    };
    match normalized {
      Ok(normalized) => optimizations.push(normalized),
      Err(error) => errors.push(error),
    }
  }

  if !errors.is_empty() {
    return Err(errors.into());
  }

  Ok(NormalizedOptimizeOptions {
    optimizations,
    max_iterations: raw_options.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
    check_constraints: raw_options.check_constraints.unwrap_or(false),
    record_ids: raw_options.record_ids.unwrap_or(false),
  })
}

fn normalize_commons_chunk(
  options: CommonsChunkOptions,
) -> anyhow::Result<NormalizedCommonsChunkOptions> {
  let chunk_names = match (options.name, options.names) {
    (Some(name), _) => Some(vec![ArcStr::from(name)]),
    (None, Some(names)) => Some(names.into_iter().map(ArcStr::from).collect()),
    (None, None) => None,
  };

  let children = options.children.unwrap_or(false);
  let async_commons = options.async_commons.unwrap_or_default();
  if chunk_names.is_none() && !children && !async_commons.is_enabled() {
    anyhow::bail!(
      "Invalid options for {}: a commons chunk `name` is required unless `children` or `async` is set",
      pretty_type_name::<CommonsChunkOptions>()
    );
  }

  let selection = match options.chunks {
    _ if children => CommonsChunkSelection::Children,
    Some(chunks) => CommonsChunkSelection::Names(chunks.into_iter().map(ArcStr::from).collect()),
    None if async_commons.is_enabled() => CommonsChunkSelection::Children,
    None => CommonsChunkSelection::EntryChunks,
  };

  Ok(NormalizedCommonsChunkOptions {
    chunk_names,
    filename_template: options.filename.map(ArcStr::from),
    min_chunks: options.min_chunks.filter(|min_chunks| !matches!(min_chunks, MinChunks::Count(0))),
    selection,
    async_commons,
    min_size: options.min_size.filter(|min_size| *min_size > 0),
  })
}

fn normalize_limit_chunk_count(
  options: &LimitChunkCountOptions,
) -> NormalizedLimitChunkCountOptions {
  NormalizedLimitChunkCountOptions {
    max_chunks: options.max_chunks.filter(|max_chunks| *max_chunks >= 1),
    size: SizeOptions::new(options.chunk_overhead, options.entry_chunk_multiplicator),
  }
}

fn normalize_min_chunk_size(
  options: &MinChunkSizeOptions,
) -> anyhow::Result<NormalizedMinChunkSizeOptions> {
  let Some(min_chunk_size) = options.min_chunk_size else {
    anyhow::bail!(
      "Invalid options for {}: `minChunkSize` is required",
      pretty_type_name::<MinChunkSizeOptions>()
    );
  };
  Ok(NormalizedMinChunkSizeOptions {
    min_chunk_size,
    size: SizeOptions::new(options.chunk_overhead, options.entry_chunk_multiplicator),
  })
}

#[test]
fn test_normalize_commons_chunk() {
  let normalized = normalize_commons_chunk(CommonsChunkOptions {
    name: Some("vendor".to_string()),
    chunks: Some(vec!["a".to_string(), "b".to_string()]),
    min_chunks: Some(MinChunks::Count(0)),
    min_size: Some(0),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(normalized.chunk_names, Some(vec![arcstr::literal!("vendor")]));
  assert_eq!(
    normalized.selection,
    CommonsChunkSelection::Names(vec![arcstr::literal!("a"), arcstr::literal!("b")])
  );
  assert!(normalized.min_chunks.is_none());
  assert!(normalized.min_size.is_none());

  // `name` wins over `names`.
  let normalized = normalize_commons_chunk(CommonsChunkOptions {
    name: Some("vendor".to_string()),
    names: Some(vec!["manifest".to_string(), "runtime".to_string()]),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(normalized.chunk_names, Some(vec![arcstr::literal!("vendor")]));

  let normalized = normalize_commons_chunk(CommonsChunkOptions {
    names: Some(vec!["vendor".to_string(), "manifest".to_string()]),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(
    normalized.chunk_names,
    Some(vec![arcstr::literal!("vendor"), arcstr::literal!("manifest")])
  );

  // `children` wins over an allowlist.
  let normalized = normalize_commons_chunk(CommonsChunkOptions {
    children: Some(true),
    chunks: Some(vec!["a".to_string()]),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(normalized.chunk_names, None);
  assert_eq!(normalized.selection, CommonsChunkSelection::Children);

  let normalized = normalize_commons_chunk(CommonsChunkOptions {
    async_commons: Some(chunkopt_common::AsyncCommons::Enabled),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(normalized.selection, CommonsChunkSelection::Children);
}

#[test]
fn test_normalize_options_collects_every_error() {
  let error = normalize_options(OptimizeOptions {
    optimizations: vec![
      OptimizationOptions::CommonsChunk(CommonsChunkOptions::default()),
      OptimizationOptions::MergeDuplicateChunks,
      OptimizationOptions::MinChunkSize(MinChunkSizeOptions::default()),
      OptimizationOptions::CommonsChunk(CommonsChunkOptions {
        name: Some("a".to_string()),
        names: Some(vec!["b".to_string()]),
        ..Default::default()
      }),
      OptimizationOptions::CommonsChunk(CommonsChunkOptions {
        children: Some(false),
        ..Default::default()
      }),
    ],
    ..Default::default()
  })
  .unwrap_err();

  assert_eq!(error.len(), 3);
  assert_eq!(
    error[1].to_string(),
    "Invalid options for MinChunkSizeOptions: `minChunkSize` is required"
  );
}

#[test]
fn test_normalize_options_defaults() {
  let normalized = normalize_options(OptimizeOptions {
    optimizations: vec![OptimizationOptions::LimitChunkCount(LimitChunkCountOptions {
      max_chunks: Some(0),
      chunk_overhead: Some(0),
      entry_chunk_multiplicator: None,
    })],
    ..Default::default()
  })
  .unwrap();

  assert_eq!(normalized.max_iterations, DEFAULT_MAX_ITERATIONS);
  assert!(!normalized.record_ids);
  let NormalizedOptimization::LimitChunkCount(limit) = &normalized.optimizations[0] else {
    panic!("expected limit chunk count options");
  };
  assert_eq!(limit.max_chunks, None);
  assert_eq!(limit.size, SizeOptions { chunk_overhead: 0, entry_chunk_multiplicator: 10 });
}
