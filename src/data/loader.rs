// ============================================================
// Layer 4 — Book Loader
// ============================================================
// Loads plain-text books (.txt) from a directory and splits them
// into cleaned sentences.
//
// Most books in the corpus come from Project Gutenberg and are
// wrapped in a licence header and footer:
//
//   ... licence text ...
//   *** START OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***
//   ... the actual book ...
//   *** END OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***
//   ... more licence text ...
//
// When those markers are present only the text between them is
// used. Otherwise the whole file is the book.
//
// Sentence splitting:
//   1. Blank lines separate paragraphs
//   2. Lines inside a paragraph are joined with spaces (Gutenberg
//      hard-wraps at ~70 columns)
//   3. Each paragraph is split at '.', '!' and '?'
//   4. Each piece goes through the Preprocessor; empty results
//      are dropped
//
// Reference: Rust Book §9 (Error Handling), §12 (I/O)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::data::preprocessor::Preprocessor;
use crate::domain::book::Book;
use crate::domain::traits::CorpusSource;

const START_MARKER: &str = "*** START OF";
const END_MARKER: &str   = "*** END OF";

/// Loads all .txt books from a given directory.
pub struct BookLoader {
    dir:          PathBuf,
    max_per_book: Option<usize>,
}

impl BookLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), max_per_book: None }
    }

    /// Keep at most `limit` sentences from each book
    pub fn with_max_per_book(mut self, limit: Option<usize>) -> Self {
        self.max_per_book = limit;
        self
    }
}

impl CorpusSource for BookLoader {
    fn load_books(&self) -> Result<Vec<Book>> {
        if !self.dir.is_dir() {
            bail!("book directory '{}' does not exist", self.dir.display());
        }

        // Sort so sentence order (and therefore vocab tie-breaking)
        // does not depend on the file system's listing order.
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
            .collect();
        paths.sort();

        let preprocessor = Preprocessor::new();
        let mut books    = Vec::with_capacity(paths.len());

        for path in &paths {
            match load_single_book(path, &preprocessor, self.max_per_book) {
                Ok(book) => {
                    tracing::info!(
                        "processed book '{}': {} sentences, {} words",
                        book.source,
                        book.sentences.len(),
                        book.word_count()
                    );
                    books.push(book);
                }
                // One unreadable file should not sink the whole run
                Err(e) => tracing::warn!("Skipping '{}': {:#}", path.display(), e),
            }
        }

        tracing::info!("Loaded {} books from '{}'", books.len(), self.dir.display());
        Ok(books)
    }
}

fn load_single_book(
    path:         &Path,
    preprocessor: &Preprocessor,
    max_per_book: Option<usize>,
) -> Result<Book> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    // Old Gutenberg files are sometimes Latin-1; a lossy decode keeps
    // the ASCII words and the preprocessor drops the rest.
    let raw = String::from_utf8_lossy(&bytes);

    let mut sentences = split_sentences(strip_gutenberg_boilerplate(&raw), preprocessor);
    if let Some(limit) = max_per_book {
        sentences.truncate(limit);
    }

    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(Book::new(source, sentences))
}

/// Return only the text between the Gutenberg START and END marker
/// lines, or the whole text when the markers are missing.
pub fn strip_gutenberg_boilerplate(text: &str) -> &str {
    let body_start = text
        .find(START_MARKER)
        .and_then(|i| text[i..].find('\n').map(|nl| i + nl + 1))
        .unwrap_or(0);

    let body = &text[body_start..];
    match body.find(END_MARKER) {
        Some(end) => &body[..end],
        None      => body,
    }
}

/// Split book text into cleaned, non-empty sentences.
pub fn split_sentences(text: &str, preprocessor: &Preprocessor) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut paragraph = String::new();

    let flush = |paragraph: &mut String, sentences: &mut Vec<String>| {
        for piece in paragraph.split(['.', '!', '?']) {
            let cleaned = preprocessor.clean(piece);
            if !cleaned.is_empty() {
                sentences.push(cleaned);
            }
        }
        paragraph.clear();
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut paragraph, &mut sentences);
        } else {
            paragraph.push(' ');
            paragraph.push_str(line);
        }
    }
    flush(&mut paragraph, &mut sentences);

    sentences
}
