// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly shuffles sentences and splits them into two sets:
//   - Training set:   windows from these sentences update weights
//   - Validation set: windows from these measure generalisation
//
// Splitting happens at the sentence level, before windowing, so
// windows from one sentence never end up on both sides.
//
// Split ratio: 70% training, 30% validation (configurable)
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom. Pass a
// seed to get the same split on every run.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;

/// Randomly shuffle `samples` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.7 = 70%
/// * `seed`           - Fixed seed for a reproducible split, or None
///
/// # Example
/// ```ignore
/// let (train, val) = split_train_val(all_sentences, 0.7, Some(42));
/// ```
pub fn split_train_val<T>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    seed:           Option<u64>,
) -> (Vec<T>, Vec<T>) {
    match seed {
        Some(seed) => samples.shuffle(&mut StdRng::seed_from_u64(seed)),
        None       => samples.shuffle(&mut rand::thread_rng()),
    }

    // e.g. 100 samples * 0.7 = 70 → first 70 are training
    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, DEFAULT_TRAIN_FRACTION, None);
        assert_eq!(train.len(), 70);
        assert_eq!(val.len(),   30);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.7, None);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_makes_split_reproducible() {
        let a = split_train_val((0..30).collect::<Vec<usize>>(), 0.7, Some(7));
        let b = split_train_val((0..30).collect::<Vec<usize>>(), 0.7, Some(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.7, None);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let items: Vec<usize> = (0..10).collect();
        let (train, val)      = split_train_val(items, 1.0, None);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
