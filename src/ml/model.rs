use anyhow::{anyhow, Result};
use burn::{
    nn::{
        loss::{BinaryCrossEntropyLossConfig, CrossEntropyLossConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

use crate::data::batcher::BatchTargets;

#[derive(Config, Debug)]
pub struct Word2VecConfig {
    pub n_vocab:     usize,
    pub n_embedding: usize,
}

impl Word2VecConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Word2VecModel<B> {
        let embedding_layer = EmbeddingConfig::new(self.n_vocab, self.n_embedding).init(device);
        let output_layer    = LinearConfig::new(self.n_embedding, self.n_vocab).init(device);
        Word2VecModel {
            embedding_layer,
            output_layer,
            n_vocab:     self.n_vocab,
            n_embedding: self.n_embedding,
        }
    }
}

/// Embedding lookup followed by a linear projection back onto the
/// vocabulary. The rows of `embedding_layer` are the word vectors.
#[derive(Module, Debug)]
pub struct Word2VecModel<B: Backend> {
    pub embedding_layer: Embedding<B>,
    pub output_layer:    Linear<B>,
    pub n_vocab:         usize,
    pub n_embedding:     usize,
}

impl<B: Backend> Word2VecModel<B> {
    /// inputs: [batch, window] → logits: [batch, n_vocab]
    ///
    /// The window's embeddings are averaged, so CBOW (window = context
    /// length) and skip-gram (window = 1) share one forward pass.
    pub fn forward(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, _window] = inputs.dims();

        let embedded = self.embedding_layer.forward(inputs); // [batch, window, n_embedding]
        let pooled   = embedded
            .mean_dim(1)
            .reshape([batch_size, self.n_embedding]);

        self.output_layer.forward(pooled)
    }

    /// Cross-entropy against the centre word for CBOW, binary
    /// cross-entropy against the multi-hot context for skip-gram.
    pub fn forward_loss(
        &self,
        inputs:  Tensor<B, 2, Int>,
        targets: BatchTargets<B>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(inputs);
        let device = logits.device();

        let loss = match targets {
            BatchTargets::Class(centres) => CrossEntropyLossConfig::new()
                .init(&device)
                .forward(logits.clone(), centres),
            BatchTargets::MultiHot(context) => BinaryCrossEntropyLossConfig::new()
                .with_logits(true)
                .init(&device)
                .forward(logits.clone(), context),
        };

        (loss, logits)
    }

    /// The embedding matrix, row-major [n_vocab * n_embedding].
    pub fn embeddings(&self) -> Result<Vec<f32>> {
        self.embedding_layer
            .weight
            .val()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read embedding weights: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn model() -> Word2VecModel<TestBackend> {
        Word2VecConfig::new(12, 5).init(&Default::default())
    }

    #[test]
    fn test_forward_shape_cbow_window() {
        let device = Default::default();
        let inputs = Tensor::<TestBackend, 1, Int>::from_ints([1, 4, 2, 5, 3, 6], &device)
            .reshape([3, 2]);
        assert_eq!(model().forward(inputs).dims(), [3, 12]);
    }

    #[test]
    fn test_forward_shape_skip_gram_window() {
        let device = Default::default();
        let inputs = Tensor::<TestBackend, 1, Int>::from_ints([4, 7], &device).reshape([2, 1]);
        assert_eq!(model().forward(inputs).dims(), [2, 12]);
    }

    #[test]
    fn test_cbow_loss_is_finite_scalar() {
        let device  = Default::default();
        let inputs  = Tensor::<TestBackend, 1, Int>::from_ints([1, 4, 2, 5], &device).reshape([2, 2]);
        let centres = Tensor::<TestBackend, 1, Int>::from_ints([7, 8], &device);

        let (loss, logits) = model().forward_loss(inputs, BatchTargets::Class(centres));
        let loss: f64 = loss.into_scalar().elem::<f64>();
        assert!(loss.is_finite() && loss > 0.0);
        assert_eq!(logits.dims(), [2, 12]);
    }

    #[test]
    fn test_skip_gram_loss_is_finite_scalar() {
        let device  = Default::default();
        let inputs  = Tensor::<TestBackend, 1, Int>::from_ints([4, 7], &device).reshape([2, 1]);
        let mut hot = vec![0i32; 24];
        hot[1] = 1;
        hot[12 + 5] = 1;
        let context = Tensor::<TestBackend, 1, Int>::from_ints(hot.as_slice(), &device).reshape([2, 12]);

        let (loss, _) = model().forward_loss(inputs, BatchTargets::MultiHot(context));
        let loss: f64 = loss.into_scalar().elem::<f64>();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn test_embeddings_are_row_major_vocab_by_dim() {
        assert_eq!(model().embeddings().unwrap().len(), 12 * 5);
    }
}
