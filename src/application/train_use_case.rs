// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load books into sentences      (Layer 4 - data)
//   Resume: check the saved run still fits (Layer 6 - infra)
//   Step 2: Build the vocabulary           (Layer 6 - infra)
//   Step 3: Encode to fixed-length ids     (Layer 4 - data)
//   Step 4: Split train/validation         (Layer 4 - data)
//   Step 5: Window into CBOW / skip-gram   (Layer 4 - data)
//   Step 6: Save config                    (Layer 6 - infra)
//   Step 7: Run training loop              (Layer 5 - ml)
//   Step 8: Export vectors and charts      (Layer 6 - infra)
//   Step 9: Analogy evaluation, if asked   (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    analogies::read_analogies,
    dataset::WindowDataset,
    encoder::{encode_sentences, suggested_padding_len},
    loader::BookLoader,
    splitter::{split_train_val, DEFAULT_TRAIN_FRACTION},
    windowing::{build_samples, window_bound, Objective},
};
use crate::domain::{sentence::{NUM_SPECIAL_TOKENS, PAD_ID}, traits::CorpusSource};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
    plots::render_training_curves,
    tokenizer_store::{index_to_vocab, most_frequent_words, TokenizerStore},
    word_vectors::{load_word_vectors, save_word2vec_format},
};
use crate::ml::{
    evaluator::{downstream_validation, EvalReport},
    trainer::run_training,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings of a training run. Saved next to the checkpoints
// so a later `eval` can report what produced the vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:           String,
    pub outputs_dir:        String,
    /// Relative names resolve inside `outputs_dir`
    pub word_vector_fn:     String,
    pub analogies_fn:       Option<String>,
    pub vocab_size:         usize,
    pub batch_size:         usize,
    pub num_epochs:         usize,
    pub val_every:          usize,
    pub save_every:         usize,
    pub context_window_len: usize,
    pub embedding_dim:      usize,
    pub lr:                 f64,
    pub objective:          Objective,
    pub force_cpu:          bool,
    /// Start from the newest checkpoint in `outputs_dir`
    #[serde(default)]
    pub resume:             bool,
    pub max_per_book:       Option<usize>,
    pub seed:               Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:           "books".to_string(),
            outputs_dir:        "output".to_string(),
            word_vector_fn:     "learned_word_vectors.txt".to_string(),
            analogies_fn:       None,
            vocab_size:         3000,
            batch_size:         32,
            num_epochs:         30,
            val_every:          5,
            save_every:         5,
            context_window_len: 2,
            embedding_dim:      100,
            lr:                 1e-3,
            objective:          Objective::Cbow,
            force_cpu:          false,
            resume:             false,
            max_per_book:       None,
            seed:               None,
        }
    }
}

impl TrainConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size <= NUM_SPECIAL_TOKENS {
            bail!("vocab_size must be larger than {NUM_SPECIAL_TOKENS}, got {}", self.vocab_size);
        }
        for (name, value) in [
            ("batch_size",    self.batch_size),
            ("num_epochs",    self.num_epochs),
            ("val_every",     self.val_every),
            ("save_every",    self.save_every),
            ("embedding_dim", self.embedding_dim),
        ] {
            if value == 0 {
                bail!("{name} must be at least 1");
            }
        }
        window_bound(self.context_window_len)?;
        Ok(())
    }

    /// A checkpoint only fits a model of the same shape and objective.
    pub fn check_resumable(&self, previous: &TrainConfig) -> Result<()> {
        if self.vocab_size != previous.vocab_size
            || self.embedding_dim != previous.embedding_dim
            || self.objective != previous.objective
        {
            bail!(
                "cannot resume: checkpoint was trained with vocab_size={}, embedding_dim={}, \
                 objective={:?}, but this run asks for vocab_size={}, embedding_dim={}, objective={:?}",
                previous.vocab_size, previous.embedding_dim, previous.objective,
                self.vocab_size, self.embedding_dim, self.objective,
            );
        }
        Ok(())
    }

    pub fn word_vector_path(&self) -> PathBuf {
        PathBuf::from(&self.outputs_dir).join(&self.word_vector_fn)
    }
}

/// What a finished run reports back to the CLI.
#[derive(Debug)]
pub struct TrainSummary {
    pub history:          Vec<EpochMetrics>,
    pub word_vector_path: PathBuf,
    pub metrics_path:     PathBuf,
    pub chart_paths:      Vec<PathBuf>,
    pub report:           Option<EvalReport>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load books ────────────────────────────────────────────────
        tracing::info!("Loading books from '{}'", cfg.data_dir);
        let loader    = BookLoader::new(&cfg.data_dir).with_max_per_book(cfg.max_per_book);
        let sentences = loader.load_sentences()?;
        if sentences.is_empty() {
            bail!("no sentences found in '{}'", cfg.data_dir);
        }
        tracing::info!("Loaded {} sentences", sentences.len());

        let ckpt_manager = CheckpointManager::new(&cfg.outputs_dir)?;
        let tok_store    = TokenizerStore::new(&cfg.outputs_dir);

        // ── Resume guard ──────────────────────────────────────────────────────
        // Runs before tokenizer.json and train_config.json are overwritten
        if cfg.resume {
            let previous = ckpt_manager
                .load_config()?
                .with_context(|| format!("cannot resume: no saved run in '{}'", cfg.outputs_dir))?;
            cfg.check_resumable(&previous)?;

            let saved_vocab = index_to_vocab(&tok_store.load()?);
            let new_words   = most_frequent_words(&sentences, cfg.vocab_size - NUM_SPECIAL_TOKENS);
            if saved_vocab.get(NUM_SPECIAL_TOKENS..) != Some(new_words.as_slice()) {
                bail!("cannot resume: the corpus yields a different vocabulary than the checkpoint was trained on");
            }
        }

        // ── Step 2: Vocabulary ────────────────────────────────────────────────
        let tokenizer = tok_store.build_and_save(&sentences, cfg.vocab_size)?;

        // ── Step 3: Encode ────────────────────────────────────────────────────
        let seq_len = suggested_padding_len(&sentences);
        tracing::info!("Padding sentences to {} tokens", seq_len);
        let encoded = encode_sentences(&sentences, &tokenizer, seq_len)?;

        // ── Step 4: Train / validation split ──────────────────────────────────
        let (train_sents, val_sents) = split_train_val(encoded, DEFAULT_TRAIN_FRACTION, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation sentences",
            train_sents.len(),
            val_sents.len()
        );

        // ── Step 5: Windowed samples ──────────────────────────────────────────
        let train_dataset = WindowDataset::new(
            build_samples(cfg.objective, &train_sents, cfg.context_window_len, PAD_ID)?
        );
        let val_dataset = WindowDataset::new(
            build_samples(cfg.objective, &val_sents, cfg.context_window_len, PAD_ID)?
        );
        tracing::info!(
            "{:?} samples: {} train, {} validation, input width {:?}",
            cfg.objective,
            train_dataset.len(),
            val_dataset.len(),
            train_dataset.input_width()
        );

        // ── Step 6: Save config ───────────────────────────────────────────────
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.outputs_dir)?;

        // ── Step 7: Train (Layer 5) ───────────────────────────────────────────
        let outcome = run_training(cfg, train_dataset, val_dataset, &ckpt_manager, &metrics)?;

        // ── Step 8: Export vectors ────────────────────────────────────────────
        let word_vector_path = cfg.word_vector_path();
        save_word2vec_format(
            &word_vector_path,
            &index_to_vocab(&tokenizer),
            &outcome.embeddings,
            cfg.embedding_dim,
        )?;
        let chart_paths = render_training_curves(&cfg.outputs_dir, &outcome.history)?;

        // ── Step 9: Downstream evaluation ─────────────────────────────────────
        let report = match &cfg.analogies_fn {
            Some(analogies_fn) => {
                let vectors   = load_word_vectors(&word_vector_path)?;
                let analogies = read_analogies(analogies_fn)?;
                Some(downstream_validation(&vectors, &analogies))
            }
            None => None,
        };

        Ok(TrainSummary {
            history: outcome.history,
            word_vector_path,
            metrics_path: metrics.csv_path().to_path_buf(),
            chart_paths,
            report,
        })
    }
}
