// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with `clap` and prints results. All work is
// delegated to Layer 2 (application).
//
//   1. `train` — learns word vectors from a directory of books
//   2. `eval`  — scores saved word vectors on analogies
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvalArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "book2vec",
    version = "0.1.0",
    about = "Train CBOW / skip-gram word vectors on books, then score them on analogies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Eval(args)  => run_eval(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on books in: {}", args.data_dir);

    let summary = TrainUseCase::new(args.into()).execute()?;

    println!("Training complete.");
    println!("  metrics:      {}", summary.metrics_path.display());
    println!("  word vectors: {}", summary.word_vector_path.display());
    for chart in &summary.chart_paths {
        println!("  chart:        {}", chart.display());
    }
    if let Some(report) = summary.report {
        println!("\n{}", report.render());
    }
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    use crate::application::eval_use_case::EvalUseCase;

    let report = EvalUseCase::new(args.into()).execute()?;
    println!("{}", report.render());
    Ok(())
}
