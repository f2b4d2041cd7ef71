// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here. The data layer
// only touches Burn through the Dataset and Batcher traits.
//
//   model.rs     — Word2VecModel: embedding lookup, mean over the
//                  input window, linear projection onto the
//                  vocabulary. Shared by CBOW and skip-gram.
//
//   trainer.rs   — The epoch loop: forward pass, loss, backward
//                  pass, Adam step, periodic validation and
//                  checkpoints.
//
//   evaluator.rs — Analogy evaluation of the exported vectors.
//                  Pure Rust on host memory, no Burn needed.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Mikolov et al. (2013) Efficient Estimation of Word
//            Representations in Vector Space

/// CBOW / skip-gram embedding model
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// 3CosAdd analogy scoring
pub mod evaluator;
