pub mod optimize_output;

use std::sync::Arc;

use chunkopt_common::NormalizedOptimizeOptions;

pub type SharedOptions = Arc<NormalizedOptimizeOptions>;
