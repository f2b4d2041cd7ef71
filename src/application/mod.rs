// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training word vectors, or evaluating vectors already on disk.
//
// Rules for this layer:
//   - No model code or tensor math here
//   - Results go back to Layer 1, which prints them
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Analogy evaluation of saved word vectors
pub mod eval_use_case;
