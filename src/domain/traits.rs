// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer asks for a corpus through this trait
// and never learns whether it came from a directory of plain
// text books or somewhere else.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::book::Book;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce a corpus of books.
///
/// Implementations:
///   - BookLoader → reads every .txt file in a directory
pub trait CorpusSource {
    /// Load every book, already split into cleaned sentences.
    fn load_books(&self) -> Result<Vec<Book>>;

    /// All sentences of all books, in load order.
    fn load_sentences(&self) -> Result<Vec<String>> {
        Ok(self
            .load_books()?
            .into_iter()
            .flat_map(|book| book.sentences)
            .collect())
    }
}
