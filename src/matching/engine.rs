use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::index::IndexPair;
use crate::core::records::{ComponentRecord, CoreRecord};
use crate::matching::report::{IndexMatch, MatchReport};
use crate::matching::scoring::IndexScore;

/// Default similarity a pair of indexes must exceed to match
pub const DEFAULT_THRESHOLD: u32 = 80;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Similarity threshold {0} must be below 100; nothing could ever match")]
    InvalidThreshold(u32),
}

/// Configuration for the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Both i7 and i5 similarity must be strictly greater than this
    pub threshold: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Pairs submitted index pairs with sequenced index pairs by similarity.
///
/// Submitted pairs are visited in order and each takes the first sequenced
/// pair, in order, that scores above the threshold on both indexes. This is
/// first-match, not best-match: a weaker candidate earlier in the sequenced
/// list wins over a stronger one later on.
///
/// Matched pairs from both sides go into a claimed set. Sequenced pairs whose
/// value is already claimed are not offered again, so the R1 and R2 files of
/// one library are claimed together by a single match.
pub struct IndexReconciler {
    config: ReconcileConfig,
}

impl IndexReconciler {
    /// Create a reconciler with the default threshold
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ReconcileConfig::default(),
        }
    }

    /// Create a reconciler with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidThreshold` if the threshold is 100 or
    /// more.
    pub fn with_config(config: ReconcileConfig) -> Result<Self, ReconcileError> {
        if config.threshold >= 100 {
            return Err(ReconcileError::InvalidThreshold(config.threshold));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile the components of a submission against sequenced files
    #[must_use]
    pub fn reconcile(&self, components: &[ComponentRecord], cores: &[CoreRecord]) -> MatchReport {
        let submitted: Vec<IndexPair> = components.iter().map(ComponentRecord::index_pair).collect();
        let sequenced: Vec<IndexPair> = cores.iter().map(CoreRecord::index_pair).collect();
        self.reconcile_pairs(&submitted, &sequenced)
    }

    /// Reconcile two ordered lists of index pairs
    #[must_use]
    pub fn reconcile_pairs(&self, submitted: &[IndexPair], sequenced: &[IndexPair]) -> MatchReport {
        let threshold = self.config.threshold;
        let mut claimed: BTreeSet<IndexPair> = BTreeSet::new();
        let mut matches = Vec::new();
        let mut no_match_cust = Vec::new();

        for (submitted_idx, cust) in submitted.iter().enumerate() {
            let found = sequenced
                .iter()
                .enumerate()
                .filter(|(_, core)| !claimed.contains(*core))
                .map(|(idx, core)| (idx, core, IndexScore::calculate(cust, core)))
                .find(|(_, _, score)| score.is_match(threshold));

            match found {
                Some((sequenced_idx, core, score)) => {
                    debug!(
                        submitted = %cust,
                        sequenced = %core,
                        i7 = score.i7,
                        i5 = score.i5,
                        "Matched indexes"
                    );
                    claimed.insert(cust.clone());
                    claimed.insert(core.clone());
                    matches.push(IndexMatch {
                        submitted_index: submitted_idx,
                        sequenced_index: sequenced_idx,
                        submitted: cust.clone(),
                        sequenced: core.clone(),
                        score,
                    });
                }
                None => {
                    debug!(submitted = %cust, "No sequenced match");
                    no_match_cust.push(cust.clone());
                }
            }
        }

        let no_match_core: Vec<IndexPair> = sequenced
            .iter()
            .filter(|core| !claimed.contains(*core))
            .cloned()
            .collect();

        let report = MatchReport::new(
            submitted.len(),
            sequenced.len(),
            matches,
            no_match_cust,
            no_match_core,
            claimed,
        );

        info!(
            submitted = report.submitted_count,
            sequenced = report.sequenced_count,
            matches = report.match_num,
            "Comparison complete"
        );
        report
    }
}

impl Default for IndexReconciler {
    fn default() -> Self {
        Self::new()
    }
}
