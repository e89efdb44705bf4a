//! Index reconciliation between submitted and sequenced libraries.
//!
//! - [`IndexReconciler`]: Pairs submitted (i7, i5) indexes with sequenced ones
//! - [`IndexScore`]: Per-index similarity on a 0-100 scale
//! - [`MatchReport`]: Match count, unmatched pairs on each side, and a summary
//!
//! ## Matching Algorithm
//!
//! A submitted pair matches a sequenced pair when both the i7 and the i5
//! similarity are strictly above the threshold (80 by default). Similarity is
//! the normalized indel distance ratio, so a single miscalled base in an
//! 8-base index (typically an `N` in the first cycle) still scores 88.
//!
//! Single-indexed libraries compare their i5 as the text `None`, which makes
//! two single-indexed pairs agree on i5 and keeps a single-indexed pair from
//! matching a dual-indexed one.
//!
//! ## Example
//!
//! ```rust
//! use seq_reconcile::core::index::{IndexPair, IndexSequence};
//! use seq_reconcile::matching::IndexReconciler;
//!
//! let pair = |i7: &str, i5: &str| {
//!     IndexPair::new(
//!         IndexSequence::new(i7).unwrap(),
//!         Some(IndexSequence::new(i5).unwrap()),
//!     )
//! };
//!
//! let submitted = [pair("CCCCCCCC", "NTAGAGAG"), pair("AAAAAAA", "TTTTTTTT")];
//! let sequenced = [pair("CCCCCCCT", "NTAGAGAG"), pair("GGGGGGGG", "NTAGAGAG")];
//!
//! let report = IndexReconciler::new().reconcile_pairs(&submitted, &sequenced);
//! assert_eq!(report.match_num, 1);
//! println!("{report}");
//! ```

pub mod engine;
pub mod report;
pub mod scoring;

pub use engine::{IndexReconciler, ReconcileConfig, ReconcileError};
pub use report::{IndexMatch, MatchReport};
pub use scoring::IndexScore;
