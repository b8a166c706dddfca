use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use lockstep_dtw::{AlignmentEngine, Band, DistanceMetric, Euclidean, Manhattan, Sequence};
use lockstep_io::{AlignmentMeta, AlignmentWriter, SequenceReader, to_json};

#[derive(Parser)]
#[command(name = "lockstep")]
#[command(about = "Banded, diagonal-weighted DTW alignment of feature-vector sequences")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Per-frame distance used to fill the distance matrix.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum MetricArg {
    Euclidean,
    Manhattan,
}

impl MetricArg {
    fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
        }
    }

    fn metric(self) -> &'static dyn DistanceMetric {
        match self {
            Self::Euclidean => &Euclidean,
            Self::Manhattan => &Manhattan,
        }
    }
}

/// Inputs and tuning shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct AlignArgs {
    /// CSV file with the first sequence, one frame per row
    #[arg(long)]
    seq1: PathBuf,

    /// CSV file with the second sequence, one frame per row
    #[arg(long)]
    seq2: PathBuf,

    /// Skip a header row in both CSV files
    #[arg(long, default_value_t = false)]
    header: bool,

    /// Weight applied to the local distance of diagonal steps
    #[arg(long, default_value_t = 1.0)]
    diag_weight: f64,

    /// Band half-width around the scaled diagonal (0 or 1 = unbanded)
    #[arg(long, default_value_t = 0)]
    band: usize,

    /// Per-frame distance metric
    #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
    metric: MetricArg,
}

#[derive(Subcommand)]
enum Command {
    /// Align two sequences and report the total cost and warping path
    Align {
        #[command(flatten)]
        args: AlignArgs,

        /// Write the alignment JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compute only the total alignment cost, without the path
    Cost {
        #[command(flatten)]
        args: AlignArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignSummary {
    output: String,
    rows: usize,
    cols: usize,
    total_cost: f64,
    path_len: usize,
}

#[derive(Serialize)]
struct CostOutput {
    rows: usize,
    cols: usize,
    diagonal_weight: f64,
    band: usize,
    metric: &'static str,
    total_cost: f64,
}

fn read_sequence(path: &Path, header: bool, label: &str) -> Result<Sequence> {
    let sequence = SequenceReader::new(path)
        .with_headers(header)
        .read()
        .with_context(|| format!("failed to read {label} from {}", path.display()))?;
    info!(label, frames = sequence.len(), dim = sequence.dim(), "sequence loaded");
    Ok(sequence)
}

fn load(args: &AlignArgs) -> Result<(Sequence, Sequence, AlignmentEngine)> {
    let seq1 = read_sequence(&args.seq1, args.header, "seq1")?;
    let seq2 = read_sequence(&args.seq2, args.header, "seq2")?;
    let engine = AlignmentEngine::new(args.diag_weight, Band::new(args.band))
        .context("invalid alignment parameters")?;
    Ok((seq1, seq2, engine))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Align { args, output } => {
            let (seq1, seq2, engine) = load(&args)?;

            let alignment = engine
                .align_with(seq1.as_view(), seq2.as_view(), args.metric.metric())
                .context("alignment failed")?;
            info!(
                total_cost = alignment.total_cost,
                path_len = alignment.path.len(),
                "alignment complete"
            );

            let meta = AlignmentMeta::new(&engine, args.metric.name());
            match output {
                Some(path) => {
                    AlignmentWriter::new(&path)
                        .write(&alignment, &meta)
                        .context("failed to write alignment")?;
                    let summary = AlignSummary {
                        output: path.display().to_string(),
                        rows: seq1.len(),
                        cols: seq2.len(),
                        total_cost: alignment.total_cost,
                        path_len: alignment.path.len(),
                    };
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                None => println!("{}", to_json(&alignment, &meta)?),
            }
        }

        Command::Cost { args } => {
            let (seq1, seq2, engine) = load(&args)?;

            let total_cost = engine
                .cost_with(seq1.as_view(), seq2.as_view(), args.metric.metric())
                .context("cost computation failed")?;

            let output = CostOutput {
                rows: seq1.len(),
                cols: seq2.len(),
                diagonal_weight: engine.diagonal_weight(),
                band: engine.band().width(),
                metric: args.metric.name(),
                total_cost,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
