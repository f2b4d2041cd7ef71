// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the corpus and the
// evaluation data. Nothing in here touches Burn, the file system
// or the tokenizer. Those live in the data, ml and infra layers.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A book split into cleaned sentences
pub mod book;

// Fixed-length, id-encoded sentences
pub mod sentence;

// Word analogies (a:b::c:d) used for downstream evaluation
pub mod analogy;

// Core abstractions (traits) that other layers implement
pub mod traits;
