// ============================================================
// Layer 3 — EncodedSentence Domain Type
// ============================================================
// A sentence after vocabulary lookup, framed and padded to a
// fixed length:
//
//   [<start>, w1, w2, ..., wn, <end>, <pad>, <pad>, ...]
//     0       1   2        n   len
//
// `len` is the index of the <end> token, so positions 1..len
// hold the actual words. Windowing relies on this to stop
// before it walks into the padding.

use serde::{Deserialize, Serialize};

/// Reserved vocabulary ids. The tokenizer store always assigns
/// these four before any corpus word.
pub const PAD_ID: u32 = 0;
pub const START_ID: u32 = 1;
pub const END_ID: u32 = 2;
pub const UNK_ID: u32 = 3;

pub const PAD_TOKEN: &str = "<pad>";
pub const START_TOKEN: &str = "<start>";
pub const END_TOKEN: &str = "<end>";
pub const UNK_TOKEN: &str = "<unk>";

/// Number of reserved ids at the front of every vocabulary
pub const NUM_SPECIAL_TOKENS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSentence {
    /// Token ids, always exactly `seq_len` long
    pub ids: Vec<u32>,

    /// Index of the <end> token
    pub len: usize,
}

impl EncodedSentence {
    pub fn new(ids: Vec<u32>, len: usize) -> Self {
        Self { ids, len }
    }

    /// The word ids between <start> and <end>
    pub fn words(&self) -> &[u32] {
        &self.ids[1..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_excludes_markers() {
        let s = EncodedSentence::new(vec![START_ID, 7, 8, END_ID, PAD_ID], 3);
        assert_eq!(s.words(), &[7, 8]);
    }
}
