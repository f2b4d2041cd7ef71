// ============================================================
// Layer 4 — Window Batcher
// ============================================================
// Implements Burn's Batcher trait: stacks a Vec<WindowSample>
// into tensors on the target device.
//
//   inputs  → [N, W] Int     (W = window length for CBOW, 1 for skip-gram)
//   targets → CBOW:      [N] Int         class id of the centre word
//             Skip-gram: [N, V] Int      multi-hot over the vocabulary
//
// The multi-hot matrix is only materialised here, one batch at a
// time. Storing it per sample would cost V ints per example.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::WindowSample;
use crate::data::windowing::Objective;

/// Ground truth for one batch, shaped for the objective's loss.
#[derive(Debug, Clone)]
pub enum BatchTargets<B: Backend> {
    /// Centre word ids — shape: [batch_size]
    Class(Tensor<B, 1, Int>),
    /// 1 where a vocabulary id appears in the context — shape: [batch_size, n_vocab]
    MultiHot(Tensor<B, 2, Int>),
}

#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Input word ids — shape: [batch_size, window]
    pub inputs: Tensor<B, 2, Int>,

    pub targets: BatchTargets<B>,

    /// Raw target ids per sample, kept on the host for skip-gram
    /// top-k accuracy.
    pub target_ids: Vec<Vec<u32>>,
}

#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device:    B::Device,
    pub objective: Objective,
    pub n_vocab:   usize,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device, objective: Objective, n_vocab: usize) -> Self {
        Self { device, objective, n_vocab }
    }
}

impl<B: Backend> Batcher<B, WindowSample, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<WindowSample>, _device: &B::Device) -> WindowBatch<B> {
        WindowBatcher::batch(self, items)
    }
}

impl<B: Backend> WindowBatcher<B> {
    pub fn batch(&self, items: Vec<WindowSample>) -> WindowBatch<B> {
        let batch_size = items.len();
        // Every sample from one objective has the same input width
        let width      = items[0].inputs.len();

        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.inputs.iter().map(|&x| x as i32))
            .collect();

        let inputs = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, width]);

        let targets = match self.objective {
            Objective::Cbow => {
                let centres: Vec<i32> = items
                    .iter()
                    .map(|s| s.targets[0] as i32)
                    .collect();
                BatchTargets::Class(Tensor::<B, 1, Int>::from_ints(
                    centres.as_slice(), &self.device
                ))
            }
            Objective::SkipGram => {
                let multi_hot = multi_hot_rows(&items, self.n_vocab);
                BatchTargets::MultiHot(Tensor::<B, 1, Int>::from_ints(
                    multi_hot.as_slice(), &self.device
                ).reshape([batch_size, self.n_vocab]))
            }
        };

        let target_ids = items.into_iter().map(|s| s.targets).collect();

        WindowBatch { inputs, targets, target_ids }
    }
}

/// Row-major [N, n_vocab] multi-hot encoding of each sample's targets.
/// Ids outside the vocabulary are ignored.
fn multi_hot_rows(items: &[WindowSample], n_vocab: usize) -> Vec<i32> {
    let mut flat = vec![0i32; items.len() * n_vocab];
    for (row, sample) in items.iter().enumerate() {
        for &id in &sample.targets {
            let id = id as usize;
            if id < n_vocab {
                flat[row * n_vocab + id] = 1;
            }
        }
    }
    flat
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn samples() -> Vec<WindowSample> {
        vec![
            WindowSample { inputs: vec![1, 5], targets: vec![4] },
            WindowSample { inputs: vec![4, 2], targets: vec![5] },
        ]
    }

    #[test]
    fn test_multi_hot_rows() {
        let items = vec![
            WindowSample { inputs: vec![4], targets: vec![1, 5, 5] },
            WindowSample { inputs: vec![5], targets: vec![4, 99] },
        ];
        let flat = multi_hot_rows(&items, 6);
        assert_eq!(flat, vec![
            0, 1, 0, 0, 0, 1,
            0, 0, 0, 0, 1, 0,
        ]);
    }

    #[test]
    fn test_cbow_batch_shapes() {
        let batcher = WindowBatcher::<TestBackend>::new(Default::default(), Objective::Cbow, 8);
        let batch   = batcher.batch(samples());

        assert_eq!(batch.inputs.dims(), [2, 2]);
        match batch.targets {
            BatchTargets::Class(t) => {
                let ids: Vec<i64> = t.into_data().convert::<i64>().to_vec().unwrap();
                assert_eq!(ids, vec![4, 5]);
            }
            BatchTargets::MultiHot(_) => panic!("CBOW batch must carry class targets"),
        }
    }

    #[test]
    fn test_skip_gram_batch_shapes() {
        let items = vec![
            WindowSample { inputs: vec![4], targets: vec![1, 5] },
            WindowSample { inputs: vec![5], targets: vec![4, 2] },
        ];
        let batcher = WindowBatcher::<TestBackend>::new(Default::default(), Objective::SkipGram, 8);
        let batch   = batcher.batch(items);

        assert_eq!(batch.inputs.dims(), [2, 1]);
        assert_eq!(batch.target_ids, vec![vec![1, 5], vec![4, 2]]);
        match batch.targets {
            BatchTargets::MultiHot(t) => {
                assert_eq!(t.dims(), [2, 8]);
                let ones: i64 = t.sum().into_scalar().elem::<i64>();
                assert_eq!(ones, 4);
            }
            BatchTargets::Class(_) => panic!("skip-gram batch must carry multi-hot targets"),
        }
    }
}
