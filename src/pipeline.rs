//! End-to-end import and comparison for one project.
//!
//! [`ImportAndCompare`] opens a submission workbook, locates its tables,
//! extracts the customer's records, scans the core facility's FASTQ directory
//! and reconciles the two. Any failure is returned as a [`RunError`] naming the
//! stage and, once it is known, the project ID. The caller records the outcome
//! with a [`RunStatus`].

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::records::CoreRecord;
use crate::core::types::SubmissionType;
use crate::matching::engine::{IndexReconciler, ReconcileConfig, ReconcileError};
use crate::matching::report::MatchReport;
use crate::parsing::fastq::{FastqError, FastqScanner, ScanConfig, SkippedFile};
use crate::parsing::layout::{LayoutConfig, LayoutError, SheetLayout};
use crate::parsing::submission::{ExtractionError, ExtractionLimits, Submission, SubmissionExtractor};
use crate::parsing::workbook::{Workbook, WorkbookError};

/// The step of a run that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    OpenWorkbook,
    FindColumns,
    ParseIndividualLibraries,
    ParsePooledLibraries,
    ParseFastqs,
    Compare,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenWorkbook => write!(f, "Failed opening submission sheet."),
            Self::FindColumns => write!(f, "Failed finding columns."),
            Self::ParseIndividualLibraries => write!(f, "Failed parsing individual libraries."),
            Self::ParsePooledLibraries => write!(f, "Failed parsing pooled libraries."),
            Self::ParseFastqs => write!(f, "Failed parsing FASTQ files."),
            Self::Compare => write!(f, "Failed comparing indexes."),
        }
    }
}

impl RunStage {
    fn for_submission(submission_type: SubmissionType) -> Self {
        match submission_type {
            SubmissionType::IndividualLibraries => Self::ParseIndividualLibraries,
            SubmissionType::PooledLibraries => Self::ParsePooledLibraries,
        }
    }
}

/// Underlying cause of a failed run
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Fastq(#[from] FastqError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// A run failure with the stage and project it happened in
#[derive(Error, Debug)]
#[error("{}{stage}", project_prefix(.project_id))]
pub struct RunError {
    /// Unknown if the failure happened before the project ID was read
    pub project_id: Option<String>,
    pub stage: RunStage,
    #[source]
    pub source: StageError,
}

fn project_prefix(project_id: &Option<String>) -> String {
    project_id
        .as_deref()
        .map(|id| format!("Project {id}: "))
        .unwrap_or_default()
}

impl RunError {
    fn new(project_id: Option<&str>, stage: RunStage, source: impl Into<StageError>) -> Self {
        Self {
            project_id: project_id.map(str::to_string),
            stage,
            source: source.into(),
        }
    }

    /// The message and every cause below it, joined with `": "`
    #[must_use]
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut cause: Option<&dyn std::error::Error> = Some(&self.source);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecStatus {
    Init,
    Ok,
    Fail,
}

impl std::fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "INIT"),
            Self::Ok => write!(f, "OK"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Status log entry for one run, ready to be stored by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub project_id: Option<String>,
    pub executed_at: DateTime<Utc>,
    pub status: ExecStatus,
    pub details: String,
}

impl RunStatus {
    #[must_use]
    pub fn init(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            executed_at: Utc::now(),
            status: ExecStatus::Init,
            details: String::new(),
        }
    }

    #[must_use]
    pub fn ok(project_id: impl Into<String>, report: &MatchReport) -> Self {
        Self {
            project_id: Some(project_id.into()),
            executed_at: Utc::now(),
            status: ExecStatus::Ok,
            details: report.summary.clone(),
        }
    }

    #[must_use]
    pub fn failed(error: &RunError) -> Self {
        Self {
            project_id: error.project_id.clone(),
            executed_at: Utc::now(),
            status: ExecStatus::Fail,
            details: error.chain(),
        }
    }
}

/// Settings for every stage of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
    pub limits: ExtractionLimits,
    pub scan: ScanConfig,
    pub reconcile: ReconcileConfig,
}

/// Everything produced by a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub submission: Submission,
    pub core_records: Vec<CoreRecord>,
    /// FASTQ files left out under [`ErrorPolicy::Continue`](crate::parsing::fastq::ErrorPolicy::Continue)
    pub skipped_files: Vec<SkippedFile>,
    /// Non-fatal FASTQ inconsistencies, e.g. i5 mismatches
    pub warnings: Vec<String>,
    pub report: MatchReport,
    pub status: RunStatus,
}

/// Import a submission sheet and a FASTQ directory, then compare their indexes
#[derive(Debug, Clone, Default)]
pub struct ImportAndCompare {
    config: PipelineConfig,
}

impl ImportAndCompare {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run on a workbook file.
    ///
    /// # Errors
    ///
    /// Returns `RunError` with stage `OpenWorkbook` if the file cannot be
    /// read, or any error of [`ImportAndCompare::run_workbook`].
    pub fn run(&self, sheet: &Path, fastq_dir: &Path) -> Result<RunOutcome, RunError> {
        let workbook =
            Workbook::open(sheet).map_err(|e| RunError::new(None, RunStage::OpenWorkbook, e))?;
        self.run_workbook(&workbook, fastq_dir)
    }

    /// Run on a workbook already in memory.
    ///
    /// # Errors
    ///
    /// Returns `RunError` for the first stage that fails: `FindColumns`,
    /// `ParseIndividualLibraries` or `ParsePooledLibraries`, `ParseFastqs`, or
    /// `Compare`.
    pub fn run_workbook(
        &self,
        workbook: &Workbook,
        fastq_dir: &Path,
    ) -> Result<RunOutcome, RunError> {
        let layout = SheetLayout::locate(workbook, &self.config.layout)
            .map_err(|e| RunError::new(None, RunStage::FindColumns, e))?;
        let project_id = layout.project_id.as_str();

        let stage = RunStage::for_submission(layout.submission_type);
        let submission = SubmissionExtractor::new(workbook, &layout, self.config.limits.clone())
            .map_err(|e| RunError::new(Some(project_id), stage, e))?
            .extract()
            .map_err(|e| RunError::new(Some(project_id), stage, e))?;

        let scan = FastqScanner::new(project_id, self.config.scan.clone())
            .scan(fastq_dir)
            .map_err(|e| RunError::new(Some(project_id), RunStage::ParseFastqs, e))?;

        let reconciler = IndexReconciler::with_config(self.config.reconcile.clone())
            .map_err(|e| RunError::new(Some(project_id), RunStage::Compare, e))?;
        let report = reconciler.reconcile(&submission.components, &scan.records);

        let status = RunStatus::ok(project_id, &report);
        info!(project_id, status = %status.status, "Run complete");

        Ok(RunOutcome {
            submission,
            core_records: scan.records,
            skipped_files: scan.skipped,
            warnings: scan.warnings,
            report,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fastq::FastqError;
    use crate::parsing::layout::GENERAL_SHEET_NAME;
    use crate::parsing::workbook::Worksheet;

    fn general_only(sample_type: &str) -> Workbook {
        Workbook::new().with_sheet(Worksheet::from_rows(
            GENERAL_SHEET_NAME,
            [["Project ID:", "Sample Type:"], ["123456", sample_type]],
        ))
    }

    #[test]
    fn test_find_columns_failure_has_no_project() {
        let err = ImportAndCompare::default()
            .run_workbook(&Workbook::new(), Path::new("."))
            .unwrap_err();
        assert_eq!(err.stage, RunStage::FindColumns);
        assert_eq!(err.project_id, None);
        assert_eq!(err.to_string(), "Failed finding columns.");
    }

    #[test]
    fn test_extraction_failure_names_project() {
        // The detail sheet is present but has no headers
        let workbook = general_only("Pooled Libraries").with_sheet(Worksheet::new("Pooled Libraries"));
        let err = ImportAndCompare::default()
            .run_workbook(&workbook, Path::new("."))
            .unwrap_err();

        assert_eq!(err.stage, RunStage::ParsePooledLibraries);
        assert_eq!(err.project_id.as_deref(), Some("123456"));
        assert_eq!(
            err.to_string(),
            "Project 123456: Failed parsing pooled libraries."
        );
        assert!(matches!(err.source, StageError::Extraction(_)));
        assert!(err
            .chain()
            .starts_with("Project 123456: Failed parsing pooled libraries.: Failed extracting pool information"));
    }

    #[test]
    fn test_open_workbook_failure() {
        let err = ImportAndCompare::default()
            .run(Path::new("/nonexistent/sheet.xlsx"), Path::new("."))
            .unwrap_err();
        assert_eq!(err.stage, RunStage::OpenWorkbook);
    }

    #[test]
    fn test_failed_status() {
        let err = RunError::new(
            Some("123456"),
            RunStage::ParseFastqs,
            FastqError::TooFewHeaders(1),
        );
        let status = RunStatus::failed(&err);
        assert_eq!(status.status, ExecStatus::Fail);
        assert_eq!(status.project_id.as_deref(), Some("123456"));
        assert_eq!(
            status.details,
            "Project 123456: Failed parsing FASTQ files.: Expected at least 2 read headers, found 1"
        );
    }

    #[test]
    fn test_exec_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ExecStatus::Ok).unwrap(), "\"OK\"");
        assert_eq!(serde_json::to_string(&ExecStatus::Fail).unwrap(), "\"FAIL\"");
        assert_eq!(RunStatus::init("1").status.to_string(), "INIT");
    }
}
