// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `eval`, and all
// their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{eval_use_case::EvalConfig, train_use_case::TrainConfig};
use crate::data::windowing::Objective;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train word vectors on a directory of .txt books
    Train(TrainArgs),

    /// Score saved word vectors on an analogy file
    Eval(EvalArgs),
}

/// Learning objective as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ObjectiveArg {
    Cbow,
    SkipGram,
}

impl From<ObjectiveArg> for Objective {
    fn from(o: ObjectiveArg) -> Self {
        match o {
            ObjectiveArg::Cbow     => Objective::Cbow,
            ObjectiveArg::SkipGram => Objective::SkipGram,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Where the vocabulary, checkpoints, metrics and vectors go
    #[arg(long, default_value = "output")]
    pub outputs_dir: String,

    /// Directory of .txt books to train on
    #[arg(long, default_value = "books")]
    pub data_dir: String,

    /// Vocabulary size including the four special tokens
    #[arg(long, default_value_t = 3000)]
    pub vocab_size: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Train on the CPU (NdArray) instead of the GPU (WGPU)
    #[arg(long)]
    pub force_cpu: bool,

    /// Continue from the newest checkpoint in outputs_dir
    #[arg(long)]
    pub resume: bool,

    /// Analogy JSON to evaluate on after training
    #[arg(long)]
    pub analogies_fn: Option<String>,

    /// File name of the exported vectors, inside outputs_dir
    #[arg(long, default_value = "learned_word_vectors.txt")]
    pub word_vector_fn: String,

    #[arg(long, default_value_t = 30)]
    pub num_epochs: usize,

    /// Validate on epoch 1 and then every N epochs
    #[arg(long, default_value_t = 5)]
    pub val_every: usize,

    /// Checkpoint the model every N epochs
    #[arg(long, default_value_t = 5)]
    pub save_every: usize,

    /// Number of context words around the centre; must be even
    #[arg(long, default_value_t = 2)]
    pub context_window_len: usize,

    #[arg(long, default_value_t = 100)]
    pub embedding_dim: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, value_enum, default_value_t = ObjectiveArg::Cbow)]
    pub objective: ObjectiveArg,

    /// Take at most N sentences from each book
    #[arg(long)]
    pub max_per_book: Option<usize>,

    /// Seed for a reproducible train/validation split and shuffle
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:           a.data_dir,
            outputs_dir:        a.outputs_dir,
            word_vector_fn:     a.word_vector_fn,
            analogies_fn:       a.analogies_fn,
            vocab_size:         a.vocab_size,
            batch_size:         a.batch_size,
            num_epochs:         a.num_epochs,
            val_every:          a.val_every,
            save_every:         a.save_every,
            context_window_len: a.context_window_len,
            embedding_dim:      a.embedding_dim,
            lr:                 a.lr,
            objective:          a.objective.into(),
            force_cpu:          a.force_cpu,
            resume:             a.resume,
            max_per_book:       a.max_per_book,
            seed:               a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Analogy JSON to score the vectors on
    #[arg(long)]
    pub analogies_fn: String,

    /// Directory the `train` run wrote to
    #[arg(long, default_value = "output")]
    pub outputs_dir: String,

    #[arg(long, default_value = "learned_word_vectors.txt")]
    pub word_vector_fn: String,
}

impl From<EvalArgs> for EvalConfig {
    fn from(a: EvalArgs) -> Self {
        EvalConfig {
            outputs_dir:    a.outputs_dir,
            word_vector_fn: a.word_vector_fn,
            analogies_fn:   a.analogies_fn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["book2vec", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.vocab_size, 3000);
        assert_eq!(cfg.context_window_len, 2);
        assert_eq!(cfg.objective, Objective::Cbow);
        assert_eq!(cfg.outputs_dir, "output");
        assert!(cfg.analogies_fn.is_none());
    }

    #[test]
    fn test_skip_gram_flag() {
        let cli = Cli::try_parse_from([
            "book2vec", "train", "--objective", "skip-gram", "--force-cpu", "--seed", "9",
        ]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.objective, Objective::SkipGram);
        assert!(cfg.force_cpu);
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn test_eval_requires_analogies() {
        assert!(Cli::try_parse_from(["book2vec", "eval"]).is_err());
        assert!(Cli::try_parse_from(["book2vec", "eval", "--analogies-fn", "a.json"]).is_ok());
    }
}
