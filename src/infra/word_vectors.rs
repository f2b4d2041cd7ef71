// ============================================================
// Layer 6 — Word Vector Files
// ============================================================
// Reads and writes the plain-text word2vec format understood by
// gensim and most embedding tools:
//
//   3000 100                      ← rows, dimensions
//   <pad> 0.012345 -0.443210 ...
//   <start> ...
//   the 0.731002 ...              ← one word per line, id order
//
// Rows are written in id order, and ids follow frequency, so the
// most frequent words come first.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// In-memory word vectors keyed by word.
#[derive(Debug, Clone)]
pub struct WordVectors {
    pub dim:     usize,
    pub words:   Vec<String>,
    pub vectors: Vec<Vec<f32>>,
    index:       HashMap<String, usize>,
}

impl WordVectors {
    pub fn new(dim: usize, words: Vec<String>, vectors: Vec<Vec<f32>>) -> Self {
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Self { dim, words, vectors, index }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }
}

/// Write `index_to_vocab.len()` rows of a row-major embedding matrix.
pub fn save_word2vec_format(
    path:           impl AsRef<Path>,
    index_to_vocab: &[String],
    embeddings:     &[f32],
    dim:            usize,
) -> Result<()> {
    let path = path.as_ref();
    if embeddings.len() < index_to_vocab.len() * dim {
        bail!(
            "embedding matrix has {} values, need {} for {} words x {} dims",
            embeddings.len(),
            index_to_vocab.len() * dim,
            index_to_vocab.len(),
            dim
        );
    }

    tracing::info!("saving word vec to '{}'", path.display());
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{} {}", index_to_vocab.len(), dim)?;

    let pb = ProgressBar::new(index_to_vocab.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?);
    pb.set_message("saving word vectors");

    for (word, row) in index_to_vocab.iter().zip(embeddings.chunks_exact(dim)) {
        write!(out, "{word}")?;
        for v in row {
            write!(out, " {v:.6}")?;
        }
        writeln!(out)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    out.flush()?;
    Ok(())
}

/// Parse a text word2vec file written by `save_word2vec_format`
/// (or any other tool emitting the same format).
pub fn load_word_vectors(path: impl AsRef<Path>) -> Result<WordVectors> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Cannot open word vectors '{}'", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .context("word vector file is empty")??;
    let (rows, dim) = parse_header(&header)?;

    let mut words   = Vec::with_capacity(rows);
    let mut vectors = Vec::with_capacity(rows);

    for (n, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let word = parts.next().unwrap_or_default().to_string();
        let vector = parts
            .map(str::parse::<f32>)
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("bad number on line {}", n + 2))?;
        if vector.len() != dim {
            bail!("line {} has {} values, header says {}", n + 2, vector.len(), dim);
        }
        words.push(word);
        vectors.push(vector);
    }

    if words.len() != rows {
        tracing::warn!("header announces {} rows but file has {}", rows, words.len());
    }

    Ok(WordVectors::new(dim, words, vectors))
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    match fields.as_slice() {
        [rows, dim] => Ok((
            rows.parse().with_context(|| format!("bad row count '{rows}'"))?,
            dim.parse().with_context(|| format!("bad dimension '{dim}'"))?,
        )),
        _ => bail!("expected '<rows> <dim>' header, got '{header}'"),
    }
}
