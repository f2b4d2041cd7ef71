// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a directory of books to tensor batches.
//
//   *.txt books
//       │
//       ▼
//   BookLoader        → strips boilerplate, splits into sentences
//       │
//       ▼
//   Preprocessor      → lowercase, no punctuation or digits
//       │
//       ▼
//   TokenizerStore    → vocabulary (infra layer)
//       │
//       ▼
//   encoder           → fixed-length id sequences with <start>/<end>/<pad>
//       │
//       ▼
//   splitter          → train / validation sentences
//       │
//       ▼
//   windowing         → CBOW or skip-gram (input, target) pairs
//       │
//       ▼
//   WindowDataset     → Burn's Dataset trait
//       │
//       ▼
//   WindowBatcher     → tensors for the training loop
//
// The analogy reader sits alongside: it feeds the evaluator,
// not the model.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads .txt books from a directory
pub mod loader;

/// Cleans raw sentences
pub mod preprocessor;

/// Encodes sentences to fixed-length id sequences
pub mod encoder;

/// Shuffles and splits sentences into train/validation sets
pub mod splitter;

/// CBOW / skip-gram context extraction
pub mod windowing;

/// Implements Burn's Dataset trait for windowed samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Reads the analogy JSON used for downstream evaluation
pub mod analogies;
