//! Core data types for submission reconciliation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`TubeRecord`], [`ComponentRecord`]: What the customer says they sent
//! - [`CoreRecord`]: What the sequencer actually produced, one per FASTQ file
//! - [`IndexSequence`], [`IndexPair`]: Validated sample index barcodes
//! - [`SubmissionType`], [`ReadDirection`], [`IndexKind`], [`CellCoord`]: Small value types
//!
//! ## Joining submitted and sequenced data
//!
//! Component and core records share no key. Sample names on the sheet rarely
//! survive the trip through the sequencing facility unchanged, so the two sides
//! are joined only by the similarity of their (i7, i5) index pairs.
//!
//! [`TubeRecord`]: records::TubeRecord
//! [`ComponentRecord`]: records::ComponentRecord
//! [`CoreRecord`]: records::CoreRecord
//! [`IndexSequence`]: index::IndexSequence
//! [`IndexPair`]: index::IndexPair
//! [`SubmissionType`]: types::SubmissionType
//! [`ReadDirection`]: types::ReadDirection
//! [`IndexKind`]: types::IndexKind
//! [`CellCoord`]: types::CellCoord

pub mod index;
pub mod records;
pub mod types;
