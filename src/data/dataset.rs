use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One windowed training example.
/// CBOW:      inputs = context ids, targets = [centre id]
/// Skip-gram: inputs = [centre id], targets = context ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSample {
    pub inputs:  Vec<u32>,
    pub targets: Vec<u32>,
}

pub struct WindowDataset {
    samples: Vec<WindowSample>,
}

impl WindowDataset {
    pub fn new(samples: Vec<WindowSample>) -> Self { Self { samples } }

    /// Width of the model input, taken from the first sample
    pub fn input_width(&self) -> Option<usize> {
        self.samples.first().map(|s| s.inputs.len())
    }
}

impl Dataset<WindowSample> for WindowDataset {
    fn get(&self, index: usize) -> Option<WindowSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
