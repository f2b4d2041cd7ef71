// ============================================================
// Layer 4 — Context Windowing
// ============================================================
// Builds (input, target) pairs from encoded sentences.
//
// With context_window_len = 2 (bound = 1) and the sentence
//
//   idx:   0        1    2    3       4      5
//          <start>  the  sea  rolled  <end>  <pad>      (len = 4)
//
// the centre positions are 1..4 (the words), giving:
//
//   CBOW       (context → centre)     Skip-gram  (centre → context)
//   [<start>, sea]    → the           the    → {<start>, sea}
//   [the, rolled]     → sea           sea    → {the, rolled}
//   [sea, <end>]      → rolled        rolled → {sea, <end>}
//
// Positions outside the sentence read as <pad>, so a window
// wider than the margin never indexes out of bounds.

use anyhow::{bail, Result};

use crate::data::dataset::WindowSample;
use crate::domain::sentence::EncodedSentence;

/// Which direction the model learns to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Objective {
    /// Continuous bag of words: context words in, centre word out
    Cbow,
    /// Skip-gram: centre word in, every context word out
    SkipGram,
}

/// The token at `index`, or `pad` when `index` falls outside the sentence.
pub fn token_at(sentence: &[u32], index: isize, pad: u32) -> u32 {
    if index < 0 || index as usize >= sentence.len() {
        pad
    } else {
        sentence[index as usize]
    }
}

/// Half-width of the window. The window must be even and cover at
/// least one word on each side.
pub fn window_bound(context_window_len: usize) -> Result<usize> {
    if context_window_len < 2 || context_window_len % 2 != 0 {
        bail!("context_window_len must be an even number >= 2, got {context_window_len}");
    }
    Ok(context_window_len / 2)
}

/// The `2 * bound` tokens around `centre`, left side first.
fn context_of(ids: &[u32], centre: usize, bound: usize, pad: u32) -> Vec<u32> {
    let c = centre as isize;
    let b = bound as isize;
    (c - b..=c + b)
        .filter(|&i| i != c)
        .map(|i| token_at(ids, i, pad))
        .collect()
}

/// Centre positions that have a full window inside the padded
/// sequence and sit before the <end> token.
fn centres(sentence: &EncodedSentence, bound: usize) -> impl Iterator<Item = usize> + '_ {
    (bound..sentence.ids.len().saturating_sub(bound)).take_while(move |&i| i < sentence.len)
}

/// CBOW samples: `inputs` = context, `targets` = [centre].
pub fn cbow_samples(
    sentences:          &[EncodedSentence],
    context_window_len: usize,
    pad:                u32,
) -> Result<Vec<WindowSample>> {
    let bound = window_bound(context_window_len)?;
    Ok(sentences
        .iter()
        .flat_map(|s| {
            centres(s, bound).map(move |i| WindowSample {
                inputs:  context_of(&s.ids, i, bound, pad),
                targets: vec![s.ids[i]],
            })
        })
        .collect())
}

/// Skip-gram samples: `inputs` = [centre], `targets` = context.
pub fn skip_gram_samples(
    sentences:          &[EncodedSentence],
    context_window_len: usize,
    pad:                u32,
) -> Result<Vec<WindowSample>> {
    let bound = window_bound(context_window_len)?;
    Ok(sentences
        .iter()
        .flat_map(|s| {
            centres(s, bound).map(move |i| WindowSample {
                inputs:  vec![s.ids[i]],
                targets: context_of(&s.ids, i, bound, pad),
            })
        })
        .collect())
}

/// Dispatch on the objective.
pub fn build_samples(
    objective:          Objective,
    sentences:          &[EncodedSentence],
    context_window_len: usize,
    pad:                u32,
) -> Result<Vec<WindowSample>> {
    match objective {
        Objective::Cbow     => cbow_samples(sentences, context_window_len, pad),
        Objective::SkipGram => skip_gram_samples(sentences, context_window_len, pad),
    }
}
