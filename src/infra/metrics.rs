// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training curves to a CSV file, one row per epoch.
//
// The four curves of a run live in this one file:
//   - training loss        - training accuracy
//   - validation loss      - validation accuracy
//
// Validation only runs every `val_every` epochs, so the
// validation cells are left empty on the other rows. Any
// spreadsheet or plotting tool treats those as gaps.
//
// Example CSV output:
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,7.412000,0.031000,7.104000,0.042000
//   2,6.903100,0.054000,,
//   ...
//
// The file is rewritten at the start of every run.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "epoch,train_loss,train_acc,val_loss,val_acc";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean loss over all training batches
    pub train_loss: f64,

    /// CBOW: fraction of centre words predicted exactly.
    /// Skip-gram: fraction of top-k predictions found in the context.
    pub train_acc: f64,

    /// Set only on epochs where validation ran
    pub val_loss: Option<f64>,
    pub val_acc:  Option<f64>,
}

impl EpochMetrics {
    pub fn train_only(epoch: usize, train_loss: f64, train_acc: f64) -> Self {
        Self { epoch, train_loss, train_acc, val_loss: None, val_acc: None }
    }

    pub fn with_validation(mut self, val_loss: f64, val_acc: f64) -> Self {
        self.val_loss = Some(val_loss);
        self.val_acc  = Some(val_acc);
        self
    }

    /// Returns true if this epoch validated below the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss.is_some_and(|v| v < best_val_loss)
    }

    fn csv_row(&self) -> String {
        let opt = |v: Option<f64>| v.map(|v| format!("{v:.6}")).unwrap_or_default();
        format!(
            "{},{:.6},{:.6},{},{}",
            self.epoch,
            self.train_loss,
            self.train_acc,
            opt(self.val_loss),
            opt(self.val_acc),
        )
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create `{dir}/metrics.csv` with a fresh header row.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        fs::write(&csv_path, format!("{HEADER}\n"))
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:?}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
