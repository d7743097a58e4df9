mod args;

use std::{fs, path::Path, time::Instant};

use ansi_term::Colour;
use anyhow::Context;
use args::{InputArgs, OutputArgs};
use chunkopt::{BuildError, ChunkGraph, GraphSnapshot, OptimizeOptions, OptimizeOutput, Optimizer};
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,
}

fn init_tracing(verbose: bool) {
  let default_filter = if verbose { "chunkopt=debug" } else { "chunkopt=warn" };
  let filter = EnvFilter::try_from_env("CHUNKOPT_LOG")
    .unwrap_or_else(|_| EnvFilter::new(default_filter));

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn optimize(input: &InputArgs) -> Result<(ChunkGraph, OptimizeOutput), BuildError> {
  let options = match &input.options {
    Some(path) => read_json::<OptimizeOptions>(path)?,
    None => OptimizeOptions::default(),
  };
  let optimizer = Optimizer::new(options)?;
  let snapshot = read_json::<GraphSnapshot>(&input.graph)?;
  let mut graph = ChunkGraph::from_snapshot(&snapshot)?;
  let output = optimizer.optimize(&mut graph)?;
  Ok((graph, output))
}

fn print_chunks(graph: &ChunkGraph) {
  let mut left = 0;
  let mut right = 0;

  let mut rows = Vec::with_capacity(graph.chunks.len() + graph.extracted_chunks.len());

  for (chunk, extracted) in graph
    .chunks
    .iter()
    .map(|chunk| (*chunk, false))
    .chain(graph.extracted_chunks.iter().map(|chunk| (*chunk, true)))
  {
    let label = match &graph.chunk_table[chunk].name {
      Some(name) => name.to_string(),
      None => graph.describe_chunk(chunk),
    };
    let id = graph.chunk_table[chunk].id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let size = graph.chunk_table[chunk]
      .modules
      .iter()
      .map(|module| graph.module_table[*module].size())
      .sum::<u64>()
      .to_string();

    left = left.max(label.len());
    right = right.max(size.len());

    let kind = if extracted {
      "extracted"
    } else if graph.chunk_table[chunk].is_initial() {
      "initial"
    } else {
      "async"
    };
    rows.push((id, label, size, kind, graph.chunk_table[chunk].modules.len()));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (id, label, size, kind, modules) in rows {
    let label_len = label.len();

    println!(
      "{}{}{:left$} {}{}{:right$}{} B{}{}",
      dim.paint(format!("[{id}] ")),
      color.paint(label),
      "",
      dim.paint(kind),
      dim.paint(" │ size: "),
      "",
      size,
      dim.paint(" │ modules: "),
      modules,
      left = left - label_len,
      right = right - size.len()
    );
  }
}

fn main() {
  let args = Commands::parse();
  init_tracing(args.output.verbose);

  let start = Instant::now();
  match optimize(&args.input) {
    Ok((graph, output)) => {
      if args.output.json {
        match serde_json::to_string_pretty(&graph.to_snapshot()) {
          Ok(json) => println!("{json}"),
          Err(error) => eprintln!("{} {}", Colour::Red.paint("Error:"), error),
        }
        return;
      }

      if !args.output.silent {
        for warning in &output.warnings {
          println!("{} {}", Colour::Yellow.paint("Warning:"), warning);
        }
        for error in &output.errors {
          println!("{} {}", Colour::Red.paint("Error:"), error);
        }

        if !graph.chunks.is_empty() || !graph.extracted_chunks.is_empty() {
          print_chunks(&graph);
        }
      }

      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!(
        "\n{} Settled after {} iterations in {}",
        Colour::Green.paint("✔"),
        output.iterations,
        Colour::White.bold().paint(elapsed)
      );
    }
    Err(errors) => {
      for error in &*errors {
        println!("{} {}", Colour::Red.paint("Error:"), error);
      }
    }
  }
}
