// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises one raw sentence before it reaches the vocabulary.
//
// Book text from Project Gutenberg carries a lot of noise that
// would otherwise end up as separate vocabulary entries:
//   - "Whale", "whale" and "whale," should all be the same word
//   - Chapter numbers and dates are not useful for embeddings
//   - Curly quotes, em-dashes and underscores used for italics
//   - Non-breaking spaces and stray control characters
//
// Cleaning steps (applied in order, in a single pass):
//   1. Lowercase every character
//   2. Map any whitespace or control character to a space
//   3. Drop digits
//   4. Drop punctuation (anything that is not a letter, '_' or space)
//   5. Collapse runs of spaces and trim both ends
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw sentence. Returns an empty string when nothing
    /// but punctuation, digits or whitespace was left.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars().flat_map(char::to_lowercase) {
            let mapped = match c {
                c if c.is_whitespace() || c.is_control() => Some(' '),
                c if c.is_numeric() => None,
                c if c.is_alphabetic() || c == '_' => Some(c),
                _ => None,
            };

            match mapped {
                Some(' ') => {
                    if !last_space {
                        out.push(' ');
                    }
                    last_space = true;
                }
                Some(c) => {
                    out.push(c);
                    last_space = false;
                }
                None => {}
            }
        }

        // A trailing space can survive when the text ends in whitespace
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
