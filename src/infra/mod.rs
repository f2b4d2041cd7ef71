// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the outputs directory:
//
//   checkpoint.rs      — Model weights via Burn's CompactRecorder,
//                        plus the run's TrainConfig as JSON.
//
//   tokenizer_store.rs — Builds the frequency-ranked vocabulary
//                        and persists it as a WordLevel
//                        tokenizer.json.
//
//   metrics.rs         — Per-epoch loss / accuracy curves as CSV.
//
//   plots.rs           — The same curves as PNG line charts.
//
//   word_vectors.rs    — Export and reload of learned vectors in
//                        the text word2vec format.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary building, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;

/// PNG charts of the training curves
pub mod plots;

/// Word2vec text format reader / writer
pub mod word_vectors;
