// ============================================================
// Layer 3 — Analogy Domain Types
// ============================================================
// An analogy a:b::c:d ("man is to king as woman is to queen").
// The evaluator asks which word is closest to b - a + c and
// checks where d lands in that ranking.
//
// Analogies are grouped twice: by type (e.g. "sem", "syn") and
// by subtype inside each type (e.g. "capitals", "plurals").

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analogy {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl Analogy {
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    pub fn words(&self) -> [&str; 4] {
        [&self.a, &self.b, &self.c, &self.d]
    }
}

/// type -> subtype -> analogies. BTreeMap keeps report order stable.
pub type AnalogySet = BTreeMap<String, BTreeMap<String, Vec<Analogy>>>;

/// Total number of analogies across every type and subtype
pub fn analogy_count(set: &AnalogySet) -> usize {
    set.values()
        .flat_map(|subtypes| subtypes.values())
        .map(|list| list.len())
        .sum()
}
