use serde::{Deserialize, Serialize};
use triple_accel::levenshtein::{levenshtein_naive_with_opts, EditCosts};

use crate::core::index::IndexPair;

/// Insertions plus deletions needed to turn `a` into `b`
#[must_use]
pub fn indel_distance(a: &str, b: &str) -> usize {
    // A substitution counts as one deletion plus one insertion
    let costs = EditCosts::new(2, 1, 0, None);
    let (distance, _) = levenshtein_naive_with_opts(a.as_bytes(), b.as_bytes(), false, costs);
    distance as usize
}

/// Similarity of two strings on a 0-100 scale.
///
/// Computed as `100 * (len_a + len_b - indel_distance) / (len_a + len_b)`,
/// rounded to the nearest integer with ties to even. Either string being empty
/// scores 0.
///
/// ```
/// use seq_reconcile::matching::scoring::ratio;
///
/// assert_eq!(ratio("CCCCCCCC", "CCCCCCCC"), 100);
/// // One miscalled base out of eight
/// assert_eq!(ratio("CCCCCCCC", "CCCCCCCT"), 88);
/// assert_eq!(ratio("AAAAAAA", "CCCCCCCT"), 0);
/// ```
#[must_use]
pub fn ratio(a: &str, b: &str) -> u32 {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let scaled = 100 * total.saturating_sub(indel_distance(a, b));
    let quotient = scaled / total;
    let remainder = scaled % total;

    let rounded = match (2 * remainder).cmp(&total) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    u32::try_from(rounded).unwrap_or(100)
}

/// Per-index similarity between a submitted and a sequenced index pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexScore {
    pub i7: u32,
    pub i5: u32,
}

impl IndexScore {
    /// Score both indexes; a missing i5 is compared as its placeholder text
    #[must_use]
    pub fn calculate(submitted: &IndexPair, sequenced: &IndexPair) -> Self {
        Self {
            i7: ratio(submitted.i7_key(), sequenced.i7_key()),
            i5: ratio(submitted.i5_key(), sequenced.i5_key()),
        }
    }

    /// Both scores strictly above `threshold`
    #[must_use]
    pub fn is_match(&self, threshold: u32) -> bool {
        self.i7 > threshold && self.i5 > threshold
    }
}
