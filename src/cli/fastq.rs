use std::path::PathBuf;

use clap::Args;

use crate::cli::{error_policy, or_dash, OutputFormat};
use crate::core::index::IndexSequence;
use crate::parsing::fastq::{FastqScan, FastqScanner, ScanConfig};
use crate::parsing::filename::FASTQ_SUFFIX;

#[derive(Args)]
pub struct FastqArgs {
    /// Directory holding FASTQ files
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Project ID to tag every record with
    #[arg(long, default_value = "-")]
    pub project_id: String,

    /// Skip files that fail to parse instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Suffix of FASTQ files to read
    #[arg(long, default_value = FASTQ_SUFFIX)]
    pub suffix: String,
}

pub fn run(args: FastqArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = ScanConfig {
        suffix: args.suffix.clone(),
        on_error: error_policy(args.keep_going),
    };
    let scan = FastqScanner::new(&args.project_id, config).scan(&args.dir)?;

    match format {
        OutputFormat::Text => print_text_scan(&args, &scan, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scan)?),
        OutputFormat::Tsv => print_tsv_scan(&scan),
    }

    Ok(())
}

fn print_text_scan(args: &FastqArgs, scan: &FastqScan, verbose: bool) {
    println!("FASTQ directory: {}", args.dir.display());
    println!("  Files parsed: {}", scan.records.len());
    println!("  Files skipped: {}", scan.skipped.len());

    println!();
    for record in &scan.records {
        println!(
            "  {}  pool: {}  sample: {}  {} {}  flowcell: {}  i7: {}  i5: {}",
            record.filename,
            record.pool_id,
            record.sample_id,
            record.lane,
            record.read,
            record.flowcell_id,
            record.i7_index_sequence,
            or_dash(record.i5_index_sequence.as_ref().map(IndexSequence::as_str)),
        );
    }

    for skipped in &scan.skipped {
        println!("  Skipped {}: {}", skipped.filename, skipped.reason);
    }

    if verbose {
        for warning in &scan.warnings {
            println!("  Warning: {warning}");
        }
    }
}

fn print_tsv_scan(scan: &FastqScan) {
    println!("project_id\tpool_id\tsample_id\tflowcell_id\tlane\tread\ti7_index_sequence\ti5_index_sequence\tfilename");
    for r in &scan.records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.project_id,
            r.pool_id,
            r.sample_id,
            r.flowcell_id,
            r.lane,
            r.read,
            r.i7_index_sequence,
            or_dash(r.i5_index_sequence.as_ref().map(IndexSequence::as_str)),
            r.filename,
        );
    }
}
