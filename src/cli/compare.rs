use std::path::PathBuf;

use clap::Args;

use crate::cli::{error_policy, or_dash, OutputFormat};
use crate::matching::engine::{ReconcileConfig, DEFAULT_THRESHOLD};
use crate::parsing::fastq::ScanConfig;
use crate::parsing::filename::FASTQ_SUFFIX;
use crate::pipeline::{ImportAndCompare, PipelineConfig, RunOutcome, RunStatus};

#[derive(Args)]
pub struct CompareArgs {
    /// Customer submission workbook (xlsx, xls or ods)
    #[arg(required = true)]
    pub sheet: PathBuf,

    /// Directory holding the core facility's FASTQ files
    #[arg(required = true)]
    pub fastq_dir: PathBuf,

    /// Skip FASTQ files that fail to parse instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Similarity (0-99) both indexes must exceed to match
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u32,

    /// Suffix of FASTQ files to read
    #[arg(long, default_value = FASTQ_SUFFIX)]
    pub suffix: String,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = PipelineConfig {
        scan: ScanConfig {
            suffix: args.suffix.clone(),
            on_error: error_policy(args.keep_going),
        },
        reconcile: ReconcileConfig {
            threshold: args.threshold,
        },
        ..PipelineConfig::default()
    };

    let outcome = match ImportAndCompare::new(config).run(&args.sheet, &args.fastq_dir) {
        Ok(outcome) => outcome,
        Err(err) => {
            let status = RunStatus::failed(&err);
            match format {
                OutputFormat::Text => {}
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                OutputFormat::Tsv => print_tsv_status(&status),
            }
            return Err(err.into());
        }
    };

    match format {
        OutputFormat::Text => print_text_outcome(&args, &outcome, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Tsv => print_tsv_outcome(&outcome),
    }

    Ok(())
}

fn print_text_outcome(args: &CompareArgs, outcome: &RunOutcome, verbose: bool) {
    let submission = &outcome.submission;

    println!("Comparison Results");
    println!("{}", "=".repeat(60));

    println!("\nSubmission: {}", args.sheet.display());
    println!("  Project ID: {}", submission.project_id);
    println!("  Submission type: {}", submission.submission_type);
    println!("  Tubes: {}", submission.tubes.len());
    println!("  Libraries: {}", submission.components.len());

    println!("\nFASTQ directory: {}", args.fastq_dir.display());
    println!("  Files parsed: {}", outcome.core_records.len());
    if !outcome.skipped_files.is_empty() {
        println!("  Files skipped: {}", outcome.skipped_files.len());
        for skipped in &outcome.skipped_files {
            println!("    {}: {}", skipped.filename, skipped.reason);
        }
    }
    for warning in &outcome.warnings {
        println!("  Warning: {warning}");
    }

    println!("\n{}", outcome.report.summary);

    if verbose && !outcome.report.matches.is_empty() {
        println!("\nMatches:");
        for m in &outcome.report.matches {
            let sample = &submission.components[m.submitted_index].sample_id;
            let file = &outcome.core_records[m.sequenced_index].filename;
            println!(
                "  {sample} {} -> {file} {} (i7 {}, i5 {})",
                m.submitted, m.sequenced, m.score.i7, m.score.i5
            );
        }
    }

    println!("\nStatus: {}", outcome.status.status);
}

fn print_tsv_outcome(outcome: &RunOutcome) {
    let report = &outcome.report;

    println!("status\tsample_id\tsubmitted_i7\tsubmitted_i5\tfilename\tsequenced_i7\tsequenced_i5\ti7_score\ti5_score");
    for m in &report.matches {
        println!(
            "match\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            outcome.submission.components[m.submitted_index].sample_id,
            m.submitted.i7_key(),
            m.submitted.i5_key(),
            outcome.core_records[m.sequenced_index].filename,
            m.sequenced.i7_key(),
            m.sequenced.i5_key(),
            m.score.i7,
            m.score.i5,
        );
    }
    for pair in &report.no_match_cust {
        println!(
            "no_match_cust\t-\t{}\t{}\t-\t-\t-\t-\t-",
            pair.i7_key(),
            pair.i5_key()
        );
    }
    for pair in &report.no_match_core {
        println!(
            "no_match_core\t-\t-\t-\t-\t{}\t{}\t-\t-",
            pair.i7_key(),
            pair.i5_key()
        );
    }
}

fn print_tsv_status(status: &RunStatus) {
    println!("project_id\texecuted_at\tstatus\tdetails");
    println!(
        "{}\t{}\t{}\t{}",
        or_dash(status.project_id.as_deref()),
        status.executed_at.to_rfc3339(),
        status.status,
        status.details.replace('\n', " "),
    );
}
