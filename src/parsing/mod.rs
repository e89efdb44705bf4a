//! Parsers for the two sides of a reconciliation run.
//!
//! The customer side comes from a submission workbook:
//!
//! - [`workbook`]: Spreadsheet loading (xlsx/xls/ods) into an in-memory cell grid
//! - [`layout`]: Locating header cells, the project ID and the submission type
//! - [`submission`]: Reading tube and component records from the located tables
//!
//! The core facility side comes from a directory of FASTQ files:
//!
//! - [`filename`]: Pool, sample, lane and read from bcl2fastq file names
//! - [`fastq`]: Flowcell and index sequences from read headers
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use seq_reconcile::parsing::fastq::{FastqScanner, ScanConfig};
//! use seq_reconcile::parsing::layout::{LayoutConfig, SheetLayout};
//! use seq_reconcile::parsing::submission::{ExtractionLimits, SubmissionExtractor};
//! use seq_reconcile::parsing::workbook::Workbook;
//!
//! let workbook = Workbook::open(Path::new("submission.xlsx")).unwrap();
//! let layout = SheetLayout::locate(&workbook, &LayoutConfig::default()).unwrap();
//! let submission = SubmissionExtractor::new(&workbook, &layout, ExtractionLimits::default())
//!     .unwrap()
//!     .extract()
//!     .unwrap();
//!
//! let scan = FastqScanner::new(&submission.project_id, ScanConfig::default())
//!     .scan(Path::new("fastqs/"))
//!     .unwrap();
//! ```

pub mod fastq;
pub mod filename;
pub mod layout;
pub mod submission;
pub mod workbook;
