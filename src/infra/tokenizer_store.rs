// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds the word vocabulary from the corpus and persists it as
// a HuggingFace WordLevel tokenizer.
//
// Vocabulary layout:
//   0 <pad>   1 <start>   2 <end>   3 <unk>
//   4..       corpus words, most frequent first
//
// Only the top `vocab_size - 4` words make it in; everything
// else encodes as <unk>. Because ids follow frequency, the
// exported word-vector file is naturally sorted with the most
// common words at the top.
//
// The sentences arriving here are already cleaned by the
// Preprocessor, so the tokenizer only has to split on
// whitespace; no normaliser is configured.
//
// Reference: tokenizers crate (WordLevel model, JSON format)

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::sentence::{
    END_TOKEN, NUM_SPECIAL_TOKENS, PAD_TOKEN, START_TOKEN, UNK_TOKEN,
};

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load a previously saved tokenizer
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    /// Count words over `sentences`, keep the `vocab_size - 4` most
    /// frequent, write tokenizer.json and load it back.
    pub fn build_and_save(&self, sentences: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let words = most_frequent_words(sentences, vocab_size.saturating_sub(NUM_SPECIAL_TOKENS));

        let mut vocab = serde_json::json!({
            PAD_TOKEN:   0,
            START_TOKEN: 1,
            END_TOKEN:   2,
            UNK_TOKEN:   3,
        });
        for (i, word) in words.iter().enumerate() {
            vocab[word.as_str()] = serde_json::json!(i + NUM_SPECIAL_TOKENS);
        }

        let special = |id: usize, content: &str| serde_json::json!({
            "id": id, "content": content, "single_word": false, "lstrip": false,
            "rstrip": false, "normalized": false, "special": true
        });

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                special(0, PAD_TOKEN),
                special(1, START_TOKEN),
                special(2, END_TOKEN),
                special(3, UNK_TOKEN),
            ],
            "normalizer": null,
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK_TOKEN
            }
        });

        let tok_path = self.path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write '{}'", tok_path.display()))?;

        tracing::info!(
            "Vocabulary built: {} words + {} special tokens, saved to '{}'",
            words.len(),
            NUM_SPECIAL_TOKENS,
            tok_path.display()
        );

        self.load()
    }
}

/// The `limit` most frequent whitespace-separated words. Ties are
/// broken by first occurrence so the result is deterministic.
pub fn most_frequent_words(sentences: &[String], limit: usize) -> Vec<String> {
    // word -> (count, first seen position)
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut seen = 0usize;

    for sentence in sentences {
        for word in sentence.split_whitespace() {
            let entry = freq.entry(word).or_insert((0, seen));
            entry.0 += 1;
            seen += 1;
        }
    }

    let mut words: Vec<(&str, (usize, usize))> = freq.into_iter().collect();
    words.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    words.truncate(limit);
    words.into_iter().map(|(w, _)| w.to_string()).collect()
}

/// Dense id -> word table covering every id the tokenizer knows.
pub fn index_to_vocab(tokenizer: &Tokenizer) -> Vec<String> {
    let size = tokenizer.get_vocab_size(true);
    (0..size as u32)
        .map(|id| tokenizer.id_to_token(id).unwrap_or_else(|| UNK_TOKEN.to_string()))
        .collect()
}
