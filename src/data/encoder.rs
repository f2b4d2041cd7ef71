// ============================================================
// Layer 4 — Sentence Encoder
// ============================================================
// Turns cleaned sentences into fixed-length id sequences:
//
//   "the sea rolled"  →  [<start>, the, sea, rolled, <end>, <pad>, ...]
//
// The fixed length (seq_len) comes from suggested_padding_len():
// the mean padded sentence length plus two standard deviations.
// That fits the large majority of sentences whole. The rare long
// ones are cut off, and <end> always takes the last slot.

use anyhow::{anyhow, Result};
use tokenizers::Tokenizer;

use crate::domain::sentence::{EncodedSentence, END_ID, PAD_ID, START_ID, UNK_ID};

/// Padded length covering most sentences: `mean + 2 * std`, rounded,
/// where each sentence's padded length is its word count plus the
/// <start> and <end> markers.
pub fn suggested_padding_len(sentences: &[String]) -> usize {
    if sentences.is_empty() {
        return 2;
    }

    let lens: Vec<f64> = sentences
        .iter()
        .map(|s| (s.split_whitespace().count() + 2) as f64)
        .collect();

    let n    = lens.len() as f64;
    let mean = lens.iter().sum::<f64>() / n;
    let var  = lens.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;

    (mean + 2.0 * var.sqrt() + 0.5) as usize
}

/// Encode every sentence to exactly `seq_len` ids.
pub fn encode_sentences(
    sentences: &[String],
    tokenizer: &Tokenizer,
    seq_len:   usize,
) -> Result<Vec<EncodedSentence>> {
    if seq_len < 2 {
        return Err(anyhow!("seq_len must leave room for <start> and <end>, got {seq_len}"));
    }

    let mut encoded     = Vec::with_capacity(sentences.len());
    let mut n_unks      = 0usize;
    let mut n_tokens    = 0usize;
    let mut n_cut_off   = 0usize;

    for sentence in sentences {
        let enc = tokenizer
            .encode(sentence.as_str(), false)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;

        let mut ids = vec![PAD_ID; seq_len];
        ids[0] = START_ID;

        let mut pos = 1usize;
        for &id in enc.get_ids() {
            if pos == seq_len - 1 {
                n_cut_off += 1;
                break;
            }
            ids[pos] = id;
            pos += 1;
        }
        ids[pos] = END_ID;

        let sentence = EncodedSentence::new(ids, pos);
        n_tokens += sentence.words().len();
        n_unks   += sentence.words().iter().filter(|&&id| id == UNK_ID).count();
        encoded.push(sentence);
    }

    tracing::info!(
        "had to represent {}/{} ({:.4}) tokens as unk",
        n_unks,
        n_tokens,
        n_unks as f64 / n_tokens.max(1) as f64
    );
    tracing::info!("cut off {} instances at len {} before true ending", n_cut_off, seq_len);
    tracing::info!("encoded {} instances", encoded.len());

    Ok(encoded)
}
