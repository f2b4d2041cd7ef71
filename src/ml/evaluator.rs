// ============================================================
// Layer 5 — Analogy Evaluator
// ============================================================
// Downstream check of the learned vectors on a:b::c:d analogies.
//
// For each analogy the query vector is b - a + c (3CosAdd, on
// unit-normalised vectors). Every other word is ranked by cosine
// similarity to the query, leaving out a, b and c themselves,
// and we look at where d lands.
//
// Scores per analogy:
//   exact  1 if d is ranked first, else 0
//   RR     1 / rank of d
//   rank   position of d (1 = best)
//
// If d falls outside the top TOP_N, is itself one of a, b, c, or
// any of the four words is not in the vocabulary, the analogy
// counts as a miss: exact 0, RR 0, rank TOP_N. Out-of-vocabulary analogies are also
// reported with a warning, because they mean the vocabulary
// was too small for the evaluation set.

use std::collections::BTreeMap;

use crate::domain::analogy::{analogy_count, Analogy, AnalogySet};
use crate::infra::word_vectors::WordVectors;

pub const TOP_N: usize = 1000;

/// Aggregate scores over a group of analogies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalogyScore {
    pub count:       usize,
    pub exact:       f64,
    pub mrr:         f64,
    pub mean_rank:   f64,
    pub out_of_vocab: usize,
}

impl AnalogyScore {
    fn add(&mut self, outcome: Outcome) {
        // Running means keep the struct valid after every update
        let n = (self.count + 1) as f64;
        let (exact, rr, rank) = match outcome {
            Outcome::Ranked(rank) if rank <= TOP_N => {
                ((rank == 1) as u8 as f64, 1.0 / rank as f64, rank as f64)
            }
            Outcome::Ranked(_) | Outcome::AnswerIsInput => (0.0, 0.0, TOP_N as f64),
            Outcome::OutOfVocab => {
                self.out_of_vocab += 1;
                (0.0, 0.0, TOP_N as f64)
            }
        };
        self.exact     += (exact - self.exact) / n;
        self.mrr       += (rr - self.mrr) / n;
        self.mean_rank += (rank - self.mean_rank) / n;
        self.count     += 1;
    }

    fn merge(&mut self, other: &AnalogyScore) {
        let total = self.count + other.count;
        if total == 0 {
            return;
        }
        let w_self  = self.count as f64 / total as f64;
        let w_other = other.count as f64 / total as f64;
        self.exact        = self.exact * w_self + other.exact * w_other;
        self.mrr          = self.mrr * w_self + other.mrr * w_other;
        self.mean_rank    = self.mean_rank * w_self + other.mean_rank * w_other;
        self.count        = total;
        self.out_of_vocab += other.out_of_vocab;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    Ranked(usize),
    /// d is one of a, b, c, which are never candidates
    AnswerIsInput,
    OutOfVocab,
}

/// Scores grouped like the input: type → subtype, plus per-type totals.
#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub subtypes: BTreeMap<String, BTreeMap<String, AnalogyScore>>,
    pub types:    BTreeMap<String, AnalogyScore>,
    pub overall:  AnalogyScore,
}

impl EvalReport {
    /// Human-readable table of every group.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (kind, subtypes) in &self.subtypes {
            out.push_str(&format!("{kind}:\n"));
            for (subtype, s) in subtypes {
                out.push_str(&format!("  {}\n", line(subtype, s)));
            }
            if let Some(total) = self.types.get(kind) {
                out.push_str(&format!("  {}\n", line("total", total)));
            }
        }
        out.push_str(&line("overall", &self.overall));
        out.push('\n');
        out
    }
}

fn line(label: &str, s: &AnalogyScore) -> String {
    format!(
        "{label:<28} n={:<5} exact={:.4}  MRR={:.4}  MR={:.1}  oov={}",
        s.count, s.exact, s.mrr, s.mean_rank, s.out_of_vocab
    )
}

/// Unit-normalised copy of the vectors for cosine ranking.
pub struct AnalogySolver<'a> {
    vectors: &'a WordVectors,
    unit:    Vec<Vec<f32>>,
}

impl<'a> AnalogySolver<'a> {
    pub fn new(vectors: &'a WordVectors) -> Self {
        let unit = vectors.vectors.iter().map(|v| normalised(v)).collect();
        Self { vectors, unit }
    }

    /// The best candidate for `d` given a, b, c, excluding the inputs.
    pub fn solve(&self, a: &str, b: &str, c: &str) -> Option<&'a str> {
        let (ia, ib, ic) = (
            self.vectors.index_of(a)?,
            self.vectors.index_of(b)?,
            self.vectors.index_of(c)?,
        );
        let query = self.query(ia, ib, ic);

        let words = &self.vectors.words;
        (0..self.unit.len())
            .filter(|&i| i != ia && i != ib && i != ic)
            .map(|i| (i, dot(&self.unit[i], &query)))
            .max_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(i, _)| words[i].as_str())
    }

    /// 1-based rank of `d` among all candidates (a, b, c excluded).
    fn rank(&self, analogy: &Analogy) -> Outcome {
        let idx = |w: &str| self.vectors.index_of(w);
        let (Some(ia), Some(ib), Some(ic), Some(id)) =
            (idx(&analogy.a), idx(&analogy.b), idx(&analogy.c), idx(&analogy.d))
        else {
            return Outcome::OutOfVocab;
        };
        if id == ia || id == ib || id == ic {
            return Outcome::AnswerIsInput;
        }

        let query   = self.query(ia, ib, ic);
        let score_d = dot(&self.unit[id], &query);

        let better = (0..self.unit.len())
            .filter(|&i| i != ia && i != ib && i != ic && i != id)
            .filter(|&i| dot(&self.unit[i], &query) > score_d)
            .count();

        Outcome::Ranked(better + 1)
    }

    fn query(&self, ia: usize, ib: usize, ic: usize) -> Vec<f32> {
        let q: Vec<f32> = self.unit[ib]
            .iter()
            .zip(&self.unit[ia])
            .zip(&self.unit[ic])
            .map(|((b, a), c)| b - a + c)
            .collect();
        normalised(&q)
    }
}

/// Score every analogy in `set` against `vectors`.
pub fn downstream_validation(vectors: &WordVectors, set: &AnalogySet) -> EvalReport {
    tracing::info!(
        "Evaluating downstream performance on analogy task over {} analogies...",
        analogy_count(set)
    );

    let solver     = AnalogySolver::new(vectors);
    let mut report = EvalReport::default();

    for (kind, subtypes) in set {
        let mut type_total = AnalogyScore::default();
        for (subtype, analogies) in subtypes {
            let mut score = AnalogyScore::default();
            if let Some(first) = analogies.first() {
                tracing::debug!(
                    "{kind}/{subtype}: {}:{}::{}:? -> {:?} (expected {})",
                    first.a, first.b, first.c,
                    solver.solve(&first.a, &first.b, &first.c),
                    first.d
                );
            }
            for analogy in analogies {
                let outcome = solver.rank(analogy);
                if outcome == Outcome::OutOfVocab {
                    let missing: Vec<&str> = analogy
                        .words()
                        .into_iter()
                        .filter(|w| vectors.index_of(w).is_none())
                        .collect();
                    tracing::warn!(
                        "analogy {}:{}::{}:{} has out-of-vocabulary words {:?}; scored as a miss",
                        analogy.a, analogy.b, analogy.c, analogy.d, missing
                    );
                }
                score.add(outcome);
            }
            type_total.merge(&score);
            report
                .subtypes
                .entry(kind.clone())
                .or_default()
                .insert(subtype.clone(), score);
        }
        report.overall.merge(&type_total);
        report.types.insert(kind.clone(), type_total);
    }

    report
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn normalised(v: &[f32]) -> Vec<f32> {
    let norm = dot(v, v).sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // A tiny space where king - man + woman lands exactly on queen.
    fn vectors() -> WordVectors {
        let words = ["man", "woman", "king", "queen", "apple"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        WordVectors::new(3, words, vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 1.0],
            vec![-1.0, -1.0, 0.2],
        ])
    }

    fn set(analogies: Vec<Analogy>) -> AnalogySet {
        let mut set = AnalogySet::new();
        set.entry("sem".into()).or_default().insert("gender".into(), analogies);
        set
    }

    #[test]
    fn test_solver_finds_queen() {
        let wv = vectors();
        let solver = AnalogySolver::new(&wv);
        assert_eq!(solver.solve("man", "king", "woman"), Some("queen"));
    }

    #[test]
    fn test_exact_hit_scores_one() {
        let wv     = vectors();
        let report = downstream_validation(&wv, &set(vec![
            Analogy::new("man", "king", "woman", "queen"),
        ]));

        let s = &report.subtypes["sem"]["gender"];
        assert_eq!(s.count, 1);
        assert_eq!(s.exact, 1.0);
        assert_eq!(s.mrr, 1.0);
        assert_eq!(s.mean_rank, 1.0);
    }

    #[test]
    fn test_second_place_scores_half() {
        let wv     = vectors();
        // man:king::woman:apple: queen outranks apple, so apple is 2nd
        let report = downstream_validation(&wv, &set(vec![
            Analogy::new("man", "king", "woman", "apple"),
        ]));

        let s = &report.overall;
        assert_eq!(s.exact, 0.0);
        assert_eq!(s.mrr, 0.5);
        assert_eq!(s.mean_rank, 2.0);
    }

    #[test]
    fn test_out_of_vocab_is_a_miss() {
        let wv     = vectors();
        let report = downstream_validation(&wv, &set(vec![
            Analogy::new("man", "king", "woman", "queen"),
            Analogy::new("man", "prince", "woman", "princess"),
        ]));

        let s = &report.types["sem"];
        assert_eq!(s.count, 2);
        assert_eq!(s.out_of_vocab, 1);
        assert_eq!(s.exact, 0.5);
        assert_eq!(s.mrr, 0.5);
        assert_eq!(s.mean_rank, (1.0 + TOP_N as f64) / 2.0);
    }

    #[test]
    fn test_answer_equal_to_an_input_is_a_miss() {
        let wv     = vectors();
        let report = downstream_validation(&wv, &set(vec![
            Analogy::new("man", "king", "woman", "woman"),
        ]));

        let s = &report.overall;
        assert_eq!(s.exact, 0.0);
        assert_eq!(s.mrr, 0.0);
        assert_eq!(s.mean_rank, TOP_N as f64);
        assert_eq!(s.out_of_vocab, 0);
    }

    #[test]
    fn test_rank_beyond_top_n_is_a_miss() {
        // a and b coincide, so the query is c = (0, 1). Every filler
        // word points the same way and beats d = (1, 0).
        let mut words   = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let mut vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        for i in 0..TOP_N + 1 {
            words.push(format!("w{i}"));
            vectors.push(vec![0.0, 1.0]);
        }
        let wv = WordVectors::new(2, words, vectors);

        let report = downstream_validation(&wv, &set(vec![Analogy::new("a", "b", "c", "d")]));

        let s = &report.overall;
        assert_eq!(s.count, 1);
        assert_eq!(s.exact, 0.0);
        assert_eq!(s.mrr, 0.0);
        assert_eq!(s.mean_rank, TOP_N as f64);
        assert_eq!(s.out_of_vocab, 0);
    }

    #[test]
    fn test_merge_weights_by_count() {
        let mut a = AnalogyScore { count: 1, exact: 1.0, mrr: 1.0, mean_rank: 1.0, out_of_vocab: 0 };
        let b     = AnalogyScore { count: 3, exact: 0.0, mrr: 0.0, mean_rank: 5.0, out_of_vocab: 2 };
        a.merge(&b);
        assert_eq!(a.count, 4);
        assert_eq!(a.exact, 0.25);
        assert_eq!(a.mean_rank, 4.0);
        assert_eq!(a.out_of_vocab, 2);
    }

    #[test]
    fn test_render_lists_every_group() {
        let wv     = vectors();
        let report = downstream_validation(&wv, &set(vec![
            Analogy::new("man", "king", "woman", "queen"),
        ]));
        let text = report.render();
        assert!(text.contains("sem:"));
        assert!(text.contains("gender"));
        assert!(text.contains("overall"));
    }
}
