use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct InputArgs {
  /// A graph snapshot in JSON.
  #[clap(long, short = 'g')]
  pub graph: PathBuf,

  /// Optimizer options in JSON. Without it only ordering and id assignment run.
  #[clap(long, short = 'o')]
  pub options: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Print the optimized graph as a JSON snapshot.
  #[clap(long)]
  pub json: bool,

  #[clap(long, short = 's')]
  pub silent: bool,

  /// Log optimizer internals. `CHUNKOPT_LOG` takes precedence.
  #[clap(long, short = 'v')]
  pub verbose: bool,
}
