//! Command-line interface for seq-reconcile.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **compare**: Import a submission sheet and a FASTQ directory and reconcile their indexes
//! - **sheet**: Show the records extracted from a submission sheet
//! - **fastq**: Show the metadata extracted from a FASTQ directory
//!
//! ## Usage
//!
//! ```text
//! # Full run
//! seq-reconcile compare submission.xlsx /data/project/FastQ_Files
//!
//! # Skip unreadable FASTQ files instead of stopping
//! seq-reconcile compare submission.xlsx /data/project/FastQ_Files --keep-going
//!
//! # JSON output for scripting
//! seq-reconcile compare submission.xlsx /data/project/FastQ_Files --format json
//!
//! # Inspect one side only
//! seq-reconcile sheet submission.xlsx --verbose
//! seq-reconcile fastq /data/project/FastQ_Files --project-id 123456 --format tsv
//! ```

use clap::{Parser, Subcommand};

use crate::parsing::fastq::ErrorPolicy;

pub mod compare;
pub mod fastq;
pub mod sheet;

#[derive(Parser)]
#[command(name = "seq-reconcile")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Reconcile customer sequencing submissions against delivered FASTQ files")]
#[command(
    long_about = "seq-reconcile checks that what a customer said they submitted matches what the sequencer produced.\n\nIt reads the tube and library tables of a submission workbook, reads the flowcell and index sequences from the headers of each FASTQ file, and pairs the two sides by index similarity:\n- Matches tolerate a single miscalled base per index\n- Unmatched libraries are listed for both the customer and the core facility\n- Inconsistent FASTQ files (mixed flowcells or indexes) are rejected"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a submission sheet and FASTQ directory, then compare indexes
    Compare(compare::CompareArgs),

    /// Extract records from a submission sheet
    Sheet(sheet::SheetArgs),

    /// Extract metadata from a directory of FASTQ files
    Fastq(fastq::FastqArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Error policy for a `--keep-going` flag
pub(crate) fn error_policy(keep_going: bool) -> ErrorPolicy {
    if keep_going {
        ErrorPolicy::Continue
    } else {
        ErrorPolicy::Abort
    }
}

/// Empty optional values show as `-` in text and TSV output
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
