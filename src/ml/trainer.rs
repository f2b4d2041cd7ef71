// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over Burn's DataLoader with Adam.
//
//   - Training runs on Autodiff<Wgpu>, or Autodiff<NdArray> with
//     --force-cpu
//   - model.valid() drops autodiff for validation, so the
//     validation batcher is built on the inner backend
//   - Validation runs on epoch 1 and then every `val_every` epochs
//   - A checkpoint is written every `save_every` epochs
//
// Accuracy depends on the objective:
//   CBOW       argmax(logits) == centre word
//   Skip-gram  share of the top-k logits (k = window length)
//              that are real context words
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{BatchTargets, WindowBatch, WindowBatcher},
    dataset::WindowDataset,
};
use crate::infra::{checkpoint::CheckpointManager, metrics::{EpochMetrics, MetricsLogger}};
use crate::ml::model::{Word2VecConfig, Word2VecModel};

type GpuBackend = Autodiff<Wgpu>;
type CpuBackend = Autodiff<NdArray>;

/// What a finished run hands back to the application layer.
pub struct TrainOutcome {
    pub history:    Vec<EpochMetrics>,
    /// Row-major [n_vocab * n_embedding] word vectors
    pub embeddings: Vec<f32>,
}

/// Pick the device and run the loop on the matching backend.
pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: WindowDataset,
    val_dataset:   WindowDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<TrainOutcome> {
    if cfg.force_cpu {
        tracing::info!("Using CPU");
        train_loop::<CpuBackend>(cfg, train_dataset, val_dataset, ckpt_manager, metrics, NdArrayDevice::Cpu)
    } else {
        let device = WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);
        train_loop::<GpuBackend>(cfg, train_dataset, val_dataset, ckpt_manager, metrics, device)
    }
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: WindowDataset,
    val_dataset:   WindowDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<TrainOutcome> {
    if train_dataset.is_empty() {
        bail!("no training samples; is the corpus empty?");
    }
    let n_train_batches = train_dataset.len().div_ceil(cfg.batch_size);

    let has_validation = !val_dataset.is_empty();
    if !has_validation {
        tracing::warn!("validation set is empty; skipping validation for this run");
    }

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = Word2VecConfig::new(cfg.vocab_size, cfg.embedding_dim);
    let mut model: Word2VecModel<B> = model_cfg.init(&device);
    if cfg.resume {
        model = ckpt_manager.load_model(model, &device)?;
    }
    tracing::info!(
        "Model ready: {:?}, n_vocab={}, n_embedding={}",
        cfg.objective, cfg.vocab_size, cfg.embedding_dim
    );

    let mut optim = AdamConfig::new().init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_batcher = WindowBatcher::<B>::new(device.clone(), cfg.objective, cfg.vocab_size);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed.unwrap_or(42))
        .num_workers(1)
        .build(train_dataset);

    // Validation on the inner backend, no autodiff overhead
    let val_batcher = WindowBatcher::<B::InnerBackend>::new(device.clone(), cfg.objective, cfg.vocab_size);
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let top_k             = cfg.context_window_len;
    let mut history       = Vec::with_capacity(cfg.num_epochs);
    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.num_epochs {
        let pb = ProgressBar::new(n_train_batches as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?);
        pb.set_message(format!("epoch {epoch}/{}", cfg.num_epochs));

        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;
        let mut train_hits     = Tally::default();

        for batch in train_loader.iter() {
            let (loss, logits) = model.forward_loss(batch.inputs.clone(), batch.targets.clone());

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;
            train_hits.add(batch_hits(logits, &batch, top_k)?);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let train_loss = mean(train_loss_sum, train_batches);
        let train_acc  = train_hits.rate();
        println!("Epoch {epoch}");
        println!("train loss : {train_loss:.6} | train acc: {train_acc:.6}");

        let mut row = EpochMetrics::train_only(epoch, train_loss, train_acc);

        // ── Validation phase ──────────────────────────────────────────────────
        if has_validation && (epoch - 1) % cfg.val_every == 0 {
            let model_valid = model.valid();

            let mut val_loss_sum = 0.0f64;
            let mut val_batches  = 0usize;
            let mut val_hits     = Tally::default();

            for batch in val_loader.iter() {
                let (loss, logits) = model_valid.forward_loss(batch.inputs.clone(), batch.targets.clone());
                val_loss_sum += loss.into_scalar().elem::<f64>();
                val_batches  += 1;
                val_hits.add(batch_hits(logits, &batch, top_k)?);
            }

            let val_loss = mean(val_loss_sum, val_batches);
            let val_acc  = val_hits.rate();
            println!("val loss : {val_loss:.6} | val acc: {val_acc:.6}");
            row = row.with_validation(val_loss, val_acc);
            if row.is_improvement(best_val_loss) {
                best_val_loss = val_loss;
                tracing::info!("New best val_loss={:.4} at epoch {}", val_loss, epoch);
            }
        }

        metrics.log(&row)?;
        history.push(row);

        if epoch % cfg.save_every == 0 {
            ckpt_manager.save_model(&model, epoch)?;
        }
    }

    tracing::info!("Training complete!");
    let embeddings = model.valid().embeddings()?;
    Ok(TrainOutcome { history, embeddings })
}

fn mean(sum: f64, n: usize) -> f64 {
    if n > 0 { sum / n as f64 } else { f64::NAN }
}

/// Correct predictions over total predictions.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Tally {
    hits:  usize,
    total: usize,
}

impl Tally {
    fn add(&mut self, other: Tally) {
        self.hits  += other.hits;
        self.total += other.total;
    }

    fn rate(&self) -> f64 {
        if self.total > 0 { self.hits as f64 / self.total as f64 } else { 0.0 }
    }
}

fn batch_hits<B: Backend>(logits: Tensor<B, 2>, batch: &WindowBatch<B>, top_k: usize) -> Result<Tally> {
    let [batch_size, n_vocab] = logits.dims();

    match &batch.targets {
        BatchTargets::Class(centres) => {
            // argmax(1) is [batch, 1]; flatten before comparing with [batch]
            let predicted = logits.argmax(1).reshape([batch_size]);
            let hits: i64 = predicted
                .equal(centres.clone())
                .int().sum().into_scalar().elem::<i64>();
            Ok(Tally { hits: hits as usize, total: batch_size })
        }
        BatchTargets::MultiHot(_) => {
            let scores: Vec<f32> = logits
                .into_data()
                .convert::<f32>()
                .to_vec::<f32>()
                .map_err(|e| anyhow::anyhow!("Cannot read logits: {e:?}"))?;

            let hits = scores
                .chunks_exact(n_vocab)
                .zip(&batch.target_ids)
                .map(|(row, context)| top_k_hits(row, top_k, context))
                .sum();
            Ok(Tally { hits, total: batch_size * top_k.min(n_vocab) })
        }
    }
}

/// How many of the `k` highest-scoring ids in `row` appear in `targets`.
fn top_k_hits(row: &[f32], k: usize, targets: &[u32]) -> usize {
    let mut ids: Vec<usize> = (0..row.len()).collect();
    let k = k.min(ids.len());
    if k == 0 {
        return 0;
    }
    ids.select_nth_unstable_by(k - 1, |&a, &b| row[b].total_cmp(&row[a]));
    ids[..k]
        .iter()
        .filter(|&&id| targets.contains(&(id as u32)))
        .count()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataloader::batcher::Batcher;
    use crate::data::dataset::WindowSample;
    use crate::data::windowing::Objective;

    type TestBackend = Autodiff<NdArray>;

    #[test]
    fn test_top_k_hits() {
        let row = [0.1, 0.9, 0.3, 0.8, -1.0];
        // top-2 = {1, 3}
        assert_eq!(top_k_hits(&row, 2, &[1, 4]), 1);
        assert_eq!(top_k_hits(&row, 2, &[3, 1]), 2);
        assert_eq!(top_k_hits(&row, 2, &[0]), 0);
        assert_eq!(top_k_hits(&row, 0, &[1]), 0);
    }

    #[test]
    fn test_tally_rate() {
        let mut t = Tally::default();
        assert_eq!(t.rate(), 0.0);
        t.add(Tally { hits: 1, total: 4 });
        t.add(Tally { hits: 2, total: 4 });
        assert_eq!(t.rate(), 0.375);
    }

    #[test]
    fn test_cbow_batch_hits_counts_argmax_matches() {
        let device  = Default::default();
        let logits  = Tensor::<NdArray, 1>::from_floats([0.0, 5.0, 1.0, 3.0, 0.0, 1.0], &device)
            .reshape([2, 3]);
        let batcher = WindowBatcher::<NdArray>::new(device, Objective::Cbow, 3);
        let batch   = batcher.batch(vec![
            WindowSample { inputs: vec![0, 2], targets: vec![1] },
            WindowSample { inputs: vec![1, 2], targets: vec![2] },
        ]);
        assert_eq!(batch_hits(logits, &batch, 2).unwrap(), Tally { hits: 1, total: 2 });
    }

    fn toy_samples(objective: Objective) -> Vec<WindowSample> {
        // A repeating "4 5 6 7" stream so every centre has one answer
        let cbow: Vec<WindowSample> = (0..40)
            .map(|i| {
                let c = 4 + (i % 4) as u32;
                let prev = 4 + ((i + 3) % 4) as u32;
                let next = 4 + ((i + 1) % 4) as u32;
                WindowSample { inputs: vec![prev, next], targets: vec![c] }
            })
            .collect();
        match objective {
            Objective::Cbow => cbow,
            Objective::SkipGram => cbow
                .into_iter()
                .map(|s| WindowSample { inputs: s.targets, targets: s.inputs })
                .collect(),
        }
    }

    fn run(objective: Objective) -> (TrainOutcome, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            outputs_dir:   dir.path().to_string_lossy().into_owned(),
            vocab_size:    8,
            embedding_dim: 4,
            batch_size:    8,
            num_epochs:    3,
            val_every:     2,
            save_every:    2,
            lr:            1e-2,
            objective,
            force_cpu:     true,
            seed:          Some(1),
            ..TrainConfig::default()
        };
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let samples = toy_samples(objective);
        let (train, val) = samples.split_at(32);
        let outcome = train_loop::<TestBackend>(
            &cfg,
            WindowDataset::new(train.to_vec()),
            WindowDataset::new(val.to_vec()),
            &ckpt,
            &metrics,
            NdArrayDevice::Cpu,
        ).unwrap();
        (outcome, dir)
    }

    #[test]
    fn test_cbow_run_records_history_and_checkpoints() {
        let (outcome, dir) = run(Objective::Cbow);

        assert_eq!(outcome.history.len(), 3);
        // validation on epochs 1 and 3
        assert!(outcome.history[0].val_loss.is_some());
        assert!(outcome.history[1].val_loss.is_none());
        assert!(outcome.history[2].val_loss.is_some());
        assert!(outcome.history.iter().all(|m| m.train_loss.is_finite()));

        assert_eq!(outcome.embeddings.len(), 8 * 4);
        assert!(dir.path().join("model_epoch_2.mpk.gz").exists());
        assert!(!dir.path().join("model_epoch_3.mpk.gz").exists());
    }

    #[test]
    fn test_empty_validation_set_leaves_gaps() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = TrainConfig {
            vocab_size: 8, embedding_dim: 4, num_epochs: 2, val_every: 1,
            force_cpu: true, ..TrainConfig::default()
        };
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();
        let outcome = train_loop::<TestBackend>(
            &cfg,
            WindowDataset::new(toy_samples(Objective::Cbow)),
            WindowDataset::new(Vec::new()),
            &ckpt,
            &metrics,
            NdArrayDevice::Cpu,
        ).unwrap();

        assert!(outcome.history.iter().all(|m| m.val_loss.is_none() && m.val_acc.is_none()));
        let csv = std::fs::read_to_string(metrics.csv_path()).unwrap();
        assert!(!csv.contains("NaN"));
    }

    #[test]
    fn test_resume_carries_saved_weights() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let saved: Word2VecModel<NdArray> = Word2VecConfig::new(8, 4).init(&NdArrayDevice::Cpu);
        ckpt.save_model(&saved, 5).unwrap();

        // lr = 0 keeps the weights exactly where the checkpoint left them
        let cfg     = TrainConfig {
            vocab_size: 8, embedding_dim: 4, num_epochs: 1, lr: 0.0,
            force_cpu: true, resume: true, ..TrainConfig::default()
        };
        let metrics = MetricsLogger::new(dir.path()).unwrap();
        let outcome = train_loop::<TestBackend>(
            &cfg,
            WindowDataset::new(toy_samples(Objective::Cbow)),
            WindowDataset::new(Vec::new()),
            &ckpt,
            &metrics,
            NdArrayDevice::Cpu,
        ).unwrap();

        // Same half-precision round trip the trainer went through
        let fresh: Word2VecModel<NdArray> = Word2VecConfig::new(8, 4).init(&NdArrayDevice::Cpu);
        let restored = ckpt.load_model(fresh, &NdArrayDevice::Cpu).unwrap();
        assert_eq!(outcome.embeddings, restored.embeddings().unwrap());
    }

    #[test]
    fn test_resume_with_other_embedding_dim_fails() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let saved: Word2VecModel<NdArray> = Word2VecConfig::new(8, 3).init(&NdArrayDevice::Cpu);
        ckpt.save_model(&saved, 5).unwrap();

        let cfg     = TrainConfig {
            vocab_size: 8, embedding_dim: 4, num_epochs: 1,
            force_cpu: true, resume: true, ..TrainConfig::default()
        };
        let metrics = MetricsLogger::new(dir.path()).unwrap();
        let result  = train_loop::<TestBackend>(
            &cfg,
            WindowDataset::new(toy_samples(Objective::Cbow)),
            WindowDataset::new(Vec::new()),
            &ckpt,
            &metrics,
            NdArrayDevice::Cpu,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resume_without_checkpoint_fails() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = TrainConfig {
            vocab_size: 8, embedding_dim: 4, force_cpu: true, resume: true,
            ..TrainConfig::default()
        };
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();
        let result  = train_loop::<TestBackend>(
            &cfg,
            WindowDataset::new(toy_samples(Objective::Cbow)),
            WindowDataset::new(Vec::new()),
            &ckpt,
            &metrics,
            NdArrayDevice::Cpu,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_skip_gram_run_produces_bounded_accuracy() {
        let (outcome, _dir) = run(Objective::SkipGram);
        for m in &outcome.history {
            assert!((0.0..=1.0).contains(&m.train_acc));
        }
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = TrainConfig { force_cpu: true, ..TrainConfig::default() };
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();
        let result  = train_loop::<TestBackend>(
            &cfg,
            WindowDataset::new(Vec::new()),
            WindowDataset::new(Vec::new()),
            &ckpt,
            &metrics,
            NdArrayDevice::Cpu,
        );
        assert!(result.is_err());
    }
}
