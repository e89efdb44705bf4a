use std::path::PathBuf;

use clap::Args;

use crate::cli::{or_dash, OutputFormat};
use crate::core::index::IndexSequence;
use crate::parsing::layout::{LayoutConfig, SheetLayout};
use crate::parsing::submission::{ExtractionLimits, Submission, SubmissionExtractor};
use crate::parsing::workbook::Workbook;

#[derive(Args)]
pub struct SheetArgs {
    /// Customer submission workbook (xlsx, xls or ods)
    #[arg(required = true)]
    pub sheet: PathBuf,
}

pub fn run(args: SheetArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let workbook = Workbook::open(&args.sheet)?;
    let layout = SheetLayout::locate(&workbook, &LayoutConfig::default())?;
    let submission =
        SubmissionExtractor::new(&workbook, &layout, ExtractionLimits::default())?.extract()?;

    match format {
        OutputFormat::Text => print_text_submission(&args, &layout, &submission, verbose),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": args.sheet.display().to_string(),
                "layout": layout,
                "submission": submission,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv_components(&submission),
    }

    Ok(())
}

fn print_text_submission(
    args: &SheetArgs,
    layout: &SheetLayout,
    submission: &Submission,
    verbose: bool,
) {
    println!("Submission: {}", args.sheet.display());
    println!("  Project ID: {}", submission.project_id);
    println!("  Submission type: {}", submission.submission_type);

    if verbose {
        println!("\nHeaders on '{}':", layout.headers.sheet());
        for (label, coord) in layout.headers.iter() {
            println!("  {:<6} {label}", coord.to_string());
        }
    }

    println!("\nTubes ({}):", submission.tubes.len());
    for tube in &submission.tubes {
        println!(
            "  {}  pool: {}  volume: {}  concentration: {}",
            tube.tube_id,
            or_dash(tube.pool_id.as_deref()),
            or_dash(tube.volume.as_deref()),
            or_dash(tube.concentration.as_deref()),
        );
    }

    println!("\nLibraries ({}):", submission.components.len());
    for component in &submission.components {
        println!(
            "  {}  pool: {}  i7: {}  i5: {}",
            component.sample_id,
            or_dash(component.pool_id.as_deref()),
            component.i7_index_sequence,
            or_dash(
                component
                    .i5_index_sequence
                    .as_ref()
                    .map(IndexSequence::as_str)
            ),
        );
    }
}

fn print_tsv_components(submission: &Submission) {
    println!("project_id\tpool_id\tsample_id\ti7_index_name\ti7_index_sequence\ti5_index_name\ti5_index_sequence");
    for c in &submission.components {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            c.project_id,
            or_dash(c.pool_id.as_deref()),
            c.sample_id,
            or_dash(c.i7_index_name.as_deref()),
            c.i7_index_sequence,
            or_dash(c.i5_index_name.as_deref()),
            or_dash(c.i5_index_sequence.as_ref().map(IndexSequence::as_str)),
        );
    }
}
