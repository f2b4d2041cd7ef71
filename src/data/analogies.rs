// ============================================================
// Layer 4 — Analogy Reader
// ============================================================
// Reads the downstream analogy file. The JSON nests analogies by
// type and then by subtype:
//
//   {
//     "sem": { "capitals": [["athens", "greece", "paris", "france"], ...] },
//     "syn": { "plurals":  ["cat cats dog dogs", "man:men::woman:women"] }
//   }
//
// Each analogy may be a 4-element array or a single string with
// the four words separated by whitespace or ':' characters.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::analogy::{Analogy, AnalogySet};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnalogy {
    Words(Vec<String>),
    Line(String),
}

type RawAnalogySet = BTreeMap<String, BTreeMap<String, Vec<RawAnalogy>>>;

pub fn read_analogies(path: impl AsRef<Path>) -> Result<AnalogySet> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read analogies from '{}'", path.display()))?;
    parse_analogies(&json)
        .with_context(|| format!("Malformed analogies file '{}'", path.display()))
}

pub fn parse_analogies(json: &str) -> Result<AnalogySet> {
    let raw: RawAnalogySet = serde_json::from_str(json)?;

    let mut set = AnalogySet::new();
    for (kind, subtypes) in raw {
        let parsed = set.entry(kind.clone()).or_default();
        for (subtype, entries) in subtypes {
            let list = entries
                .into_iter()
                .map(to_analogy)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("in {kind}/{subtype}"))?;
            parsed.insert(subtype, list);
        }
    }
    Ok(set)
}

fn to_analogy(raw: RawAnalogy) -> Result<Analogy> {
    let words: Vec<String> = match raw {
        RawAnalogy::Words(words) => words,
        RawAnalogy::Line(line) => line
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect(),
    };

    match <[String; 4]>::try_from(words) {
        Ok([a, b, c, d]) => Ok(Analogy::new(
            a.to_lowercase(),
            b.to_lowercase(),
            c.to_lowercase(),
            d.to_lowercase(),
        )),
        Err(words) => bail!("an analogy needs exactly 4 words, got {:?}", words),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analogy::analogy_count;

    #[test]
    fn test_parses_array_and_string_forms() {
        let json = r#"{
            "sem": { "capitals": [["Athens", "Greece", "Paris", "France"]] },
            "syn": { "plurals": ["cat cats dog dogs", "man:men::woman:women"] }
        }"#;
        let set = parse_analogies(json).unwrap();

        assert_eq!(analogy_count(&set), 3);
        assert_eq!(set["sem"]["capitals"][0], Analogy::new("athens", "greece", "paris", "france"));
        assert_eq!(set["syn"]["plurals"][1], Analogy::new("man", "men", "woman", "women"));
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let json = r#"{ "sem": { "bad": [["a", "b", "c"]] } }"#;
        assert!(parse_analogies(json).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_analogies("/no/such/analogies.json").is_err());
    }
}
