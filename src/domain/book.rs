// ============================================================
// Layer 3 — Book Domain Type
// ============================================================
// One book from the corpus directory, already cut into cleaned
// sentences. The source file name is kept so log lines can say
// which book produced how many sentences.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// File name the book was read from
    pub source: String,

    /// Lowercased, punctuation-free sentences in reading order
    pub sentences: Vec<String>,
}

impl Book {
    pub fn new(source: impl Into<String>, sentences: Vec<String>) -> Self {
        Self {
            source: source.into(),
            sentences,
        }
    }

    /// Total number of words across all sentences
    pub fn word_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        let book = Book::new("a.txt", vec!["the cat sat".into(), "on the mat".into()]);
        assert_eq!(book.word_count(), 6);
    }
}
