// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// File layout inside the outputs directory:
//   model_epoch_5.mpk.gz    ← weights after epoch 5
//   model_epoch_10.mpk.gz
//   ...
//   latest_epoch.json       ← number of the newest checkpoint
//   train_config.json       ← hyperparameters of the run
//
// The config is saved separately because the model has to be
// rebuilt with the same n_vocab / n_embedding before a record
// can be loaded into it.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{HalfPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

// burn >= 0.17 redefined `CompactRecorder` without gzip; keep the
// gzipped half-precision recorder it used to alias.
type CompactRecorder = NamedMpkGzFileRecorder<HalfPrecisionSettings>;

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Word2VecModel;

const CONFIG_FILE: &str = "train_config.json";
const LATEST_FILE: &str = "latest_epoch.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write `{dir}/model_epoch_{epoch}.mpk.gz` and point
    /// latest_epoch.json at it.
    pub fn save_model<B: Backend>(
        &self,
        model: &Word2VecModel<B>,
        epoch: usize,
    ) -> Result<()> {
        // The recorder appends the extension itself
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        let latest_path = self.dir.join(LATEST_FILE);
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write {LATEST_FILE}"))?;

        tracing::info!("saving model to '{}.mpk.gz'", path.display());
        Ok(())
    }

    /// Load the newest checkpoint into `model`, which must have been
    /// built with the same architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  Word2VecModel<B>,
        device: &B::Device,
    ) -> Result<Word2VecModel<B>> {
        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'", path.display())
            })?;

        let model = model.load_record(record);

        // A record from another architecture loads without complaint,
        // so compare the restored weights with the model's own sizes.
        let embedding = model.embedding_layer.weight.val().dims();
        let output    = model.output_layer.weight.val().dims();
        if embedding != [model.n_vocab, model.n_embedding]
            || output != [model.n_embedding, model.n_vocab]
        {
            bail!(
                "checkpoint '{}' holds a {:?} embedding, but the model expects [{}, {}]",
                path.display(),
                embedding,
                model.n_vocab,
                model.n_embedding
            );
        }
        Ok(model)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// The config of the run that produced this directory, if any.
    pub fn load_config(&self) -> Result<Option<TrainConfig>> {
        let path = self.dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_FILE);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{LATEST_FILE}'. No checkpoint has been saved yet"))?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
