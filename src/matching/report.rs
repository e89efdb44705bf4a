use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::index::IndexPair;
use crate::matching::scoring::IndexScore;

/// A submitted index pair and the sequenced pair it was matched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMatch {
    /// Position in the submitted list
    pub submitted_index: usize,
    /// Position in the sequenced list
    pub sequenced_index: usize,
    pub submitted: IndexPair,
    pub sequenced: IndexPair,
    pub score: IndexScore,
}

/// Outcome of reconciling one project's submitted and sequenced indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub submitted_count: usize,
    pub sequenced_count: usize,
    pub match_num: usize,
    pub matches: Vec<IndexMatch>,
    /// Submitted pairs with no sequenced counterpart
    pub no_match_cust: Vec<IndexPair>,
    /// Sequenced pairs never claimed by a match, in sequenced order
    pub no_match_core: Vec<IndexPair>,
    /// Every pair taken by a match, from either side
    pub claimed: BTreeSet<IndexPair>,
    /// Five-line human readable summary
    pub summary: String,
}

impl MatchReport {
    #[must_use]
    pub fn new(
        submitted_count: usize,
        sequenced_count: usize,
        matches: Vec<IndexMatch>,
        no_match_cust: Vec<IndexPair>,
        no_match_core: Vec<IndexPair>,
        claimed: BTreeSet<IndexPair>,
    ) -> Self {
        let match_num = matches.len();
        let summary = format_summary(
            submitted_count,
            sequenced_count,
            match_num,
            &no_match_cust,
            &no_match_core,
        );

        Self {
            submitted_count,
            sequenced_count,
            match_num,
            matches,
            no_match_cust,
            no_match_core,
            claimed,
            summary,
        }
    }

    /// True when every submitted and every sequenced pair found a partner
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.no_match_cust.is_empty() && self.no_match_core.is_empty()
    }
}

impl std::fmt::Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary)
    }
}

/// `[('AAAAAAA', 'TTTTTTTT'), ...]`
fn format_pair_list(pairs: &[IndexPair]) -> String {
    let items: Vec<String> = pairs
        .iter()
        .map(|pair| format!("('{}', '{}')", pair.i7_key(), pair.i5_key()))
        .collect();
    format!("[{}]", items.join(", "))
}

fn format_summary(
    submitted: usize,
    sequenced: usize,
    matches: usize,
    no_match_cust: &[IndexPair],
    no_match_core: &[IndexPair],
) -> String {
    [
        format!("Cust Indexes: {submitted}"),
        format!("Core Indexes: {sequenced}"),
        format!("Matches: {matches}"),
        format!(
            "Customer Indexes with no matches: {}",
            format_pair_list(no_match_cust)
        ),
        format!(
            "Core Indexes with no matches: {}",
            format_pair_list(no_match_core)
        ),
    ]
    .join("\n")
}
