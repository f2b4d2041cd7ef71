// ============================================================
// Layer 2 — EvalUseCase
// ============================================================
// Scores word vectors that an earlier `train` run exported:
//
//   Step 1: Check the vector file exists   (Layer 6 - infra)
//   Step 2: Report the run's config        (Layer 6 - infra)
//   Step 3: Load vectors and analogies     (Layers 4 and 6)
//   Step 4: Rank every analogy             (Layer 5 - ml)

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::data::analogies::read_analogies;
use crate::infra::{checkpoint::CheckpointManager, word_vectors::load_word_vectors};
use crate::ml::evaluator::{downstream_validation, EvalReport};

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub outputs_dir:    String,
    pub word_vector_fn: String,
    pub analogies_fn:   String,
}

impl EvalConfig {
    pub fn word_vector_path(&self) -> PathBuf {
        PathBuf::from(&self.outputs_dir).join(&self.word_vector_fn)
    }
}

pub struct EvalUseCase {
    config: EvalConfig,
}

impl EvalUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EvalReport> {
        let cfg  = &self.config;
        let path = cfg.word_vector_path();
        if !path.exists() {
            bail!("need to train the word vecs first! '{}' does not exist", path.display());
        }

        // Nice to have, not required: vectors may come from elsewhere
        if let Some(train_cfg) = CheckpointManager::new(&cfg.outputs_dir)?.load_config()? {
            tracing::info!(
                "Vectors trained with {:?}, vocab_size={}, embedding_dim={}, window={}",
                train_cfg.objective,
                train_cfg.vocab_size,
                train_cfg.embedding_dim,
                train_cfg.context_window_len
            );
        }

        let vectors = load_word_vectors(&path)?;
        if vectors.is_empty() {
            bail!("'{}' holds no word vectors", path.display());
        }
        tracing::info!("Loaded {} word vectors of dimension {}", vectors.len(), vectors.dim);

        let analogies = read_analogies(&cfg.analogies_fn)?;
        Ok(downstream_validation(&vectors, &analogies))
    }
}
