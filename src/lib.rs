//! # seq-reconcile
//!
//! A library for checking sequencing deliveries against customer submissions.
//!
//! A customer describes the libraries they send in a submission workbook: tubes,
//! pools, and the i7/i5 index barcodes of every library. After sequencing, the
//! core facility delivers one demultiplexed FASTQ file per library and read.
//! Sample names rarely survive that round trip unchanged, so the only reliable
//! way to tie the two sides together is the index sequences themselves.
//!
//! `seq-reconcile` extracts both sides and pairs them by index similarity,
//! reporting what was submitted but never sequenced and what was sequenced but
//! never submitted.
//!
//! ## Features
//!
//! - **Layout discovery**: Finds tables by header text, not fixed cell offsets
//! - **Two submission forms**: Individual libraries and pooled libraries
//! - **FASTQ consistency checks**: Rejects files whose read headers disagree on flowcell or i7
//! - **Miscall tolerance**: Indexes match above 80% similarity, absorbing a single `N`
//! - **Structured failures**: Every error names the stage and project that failed
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use seq_reconcile::pipeline::{ImportAndCompare, PipelineConfig, RunStatus};
//!
//! let pipeline = ImportAndCompare::new(PipelineConfig::default());
//! match pipeline.run(Path::new("submission.xlsx"), Path::new("FastQ_Files")) {
//!     Ok(outcome) => println!("{}", outcome.report),
//!     Err(err) => {
//!         let status = RunStatus::failed(&err);
//!         eprintln!("{}: {}", status.status, status.details);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Record types, index sequences and small value types
//! - [`parsing`]: Workbook, layout, submission, file name and FASTQ parsers
//! - [`matching`]: Index similarity scoring and reconciliation
//! - [`pipeline`]: The end-to-end import and compare run
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::index::{IndexPair, IndexSequence};
pub use crate::core::records::{ComponentRecord, CoreRecord, TubeRecord};
pub use crate::core::types::*;
pub use crate::matching::engine::{IndexReconciler, ReconcileConfig};
pub use crate::matching::report::MatchReport;
pub use crate::pipeline::{ImportAndCompare, RunError, RunOutcome, RunStatus};
