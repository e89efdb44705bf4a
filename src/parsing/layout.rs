//! Locate the tables of a submission workbook by their header text.
//!
//! Customer submission forms move their tables around from one release of the
//! template to the next, but the header text stays the same. Instead of fixed
//! offsets, every known header label is searched for cell by cell, in row-major
//! order, within a bounded region of the sheet. The first cell whose text equals
//! a label wins; labels that are never found are simply absent, and asking for
//! one of them with [`HeaderLocations::require`] is an error.
//!
//! Cell text is trimmed when a workbook is loaded, so a header cell matches its
//! label regardless of surrounding whitespace. Case and inner spacing must match
//! exactly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::types::{CellCoord, SubmissionType};
use crate::parsing::workbook::{Workbook, Worksheet};

/// Name of the sheet holding project-level details
pub const GENERAL_SHEET_NAME: &str = "General Information";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Worksheet '{0}' not found in submission workbook")]
    MissingSheet(String),

    #[error("Header '{label}' not found in worksheet '{sheet}'")]
    MissingHeader { label: HeaderLabel, sheet: String },

    #[error("No value below header '{label}' at {coord}")]
    MissingValue { label: HeaderLabel, coord: CellCoord },

    #[error("Unknown submission type '{0}'")]
    UnknownSubmissionType(String),
}

/// The header labels a submission form is known to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLabel {
    SampleType,
    ProjectId,
    TubeId,
    /// Pools in the "Pool Information" table
    PoolNames,
    /// Pools in the "Indexing Information" table
    PoolName,
    LibraryId,
    Volume,
    Concentration,
    Quantitation,
    Amount,
    Buffer,
    Organism,
    I7IndexName,
    I7IndexSequence,
    I5IndexName,
    I5IndexSequence,
}

impl HeaderLabel {
    /// Every label, in the order they are reported
    pub const ALL: [HeaderLabel; 16] = [
        HeaderLabel::SampleType,
        HeaderLabel::ProjectId,
        HeaderLabel::TubeId,
        HeaderLabel::PoolNames,
        HeaderLabel::PoolName,
        HeaderLabel::LibraryId,
        HeaderLabel::Volume,
        HeaderLabel::Concentration,
        HeaderLabel::Quantitation,
        HeaderLabel::Amount,
        HeaderLabel::Buffer,
        HeaderLabel::Organism,
        HeaderLabel::I7IndexName,
        HeaderLabel::I7IndexSequence,
        HeaderLabel::I5IndexName,
        HeaderLabel::I5IndexSequence,
    ];

    /// The exact cell text that marks this header
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::SampleType => "Sample Type:",
            Self::ProjectId => "Project ID:",
            Self::TubeId => "Tube ID",
            Self::PoolNames => "Pool Names",
            Self::PoolName => "Pool Name",
            Self::LibraryId => "Individual Library ID",
            Self::Volume => "Volume (ul)",
            Self::Concentration => "Concentration (ng/ul)",
            Self::Quantitation => "Quantitation Method",
            Self::Amount => "Total Amount (ug)",
            Self::Buffer => "Buffer (TE or Water)",
            Self::Organism => "Organism",
            Self::I7IndexName => "i7 Index Name",
            Self::I7IndexSequence => "i7 Index Sequence",
            Self::I5IndexName => "i5 Index Name",
            Self::I5IndexSequence => "i5 Index Sequence",
        }
    }

    /// Look up the label whose header text is exactly `text`
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.text() == text)
    }
}

impl std::fmt::Display for HeaderLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Bounds of the regions searched for header labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Rows searched on the general information sheet
    pub general_sheet_length: u32,
    /// Columns searched on the general information sheet
    pub general_sheet_width: u32,
    /// Rows searched on the submission-type sheet
    pub max_sheet_length: u32,
    /// Columns searched on the submission-type sheet
    pub max_sheet_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            general_sheet_length: 40,
            general_sheet_width: 40,
            max_sheet_length: 152,
            max_sheet_width: 14,
        }
    }
}

/// Where each header label was found on one worksheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLocations {
    sheet: String,
    locations: HashMap<HeaderLabel, CellCoord>,
}

impl HeaderLocations {
    /// Scan `sheet` row by row, column by column, within `rows` x `columns`
    /// and record the first cell matching each label.
    #[must_use]
    pub fn scan(sheet: &Worksheet, rows: u32, columns: u32) -> Self {
        let mut locations = HashMap::new();

        for row in 1..=rows {
            for column in 1..=columns {
                let coord = CellCoord::new(column, row);
                let Some(label) = sheet.value(coord).and_then(HeaderLabel::from_text) else {
                    continue;
                };
                locations.entry(label).or_insert(coord);
            }
        }

        Self {
            sheet: sheet.name().to_string(),
            locations,
        }
    }

    #[must_use]
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    #[must_use]
    pub fn get(&self, label: HeaderLabel) -> Option<CellCoord> {
        self.locations.get(&label).copied()
    }

    /// Location of `label`, which the caller cannot do without.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MissingHeader` if the label was not found.
    pub fn require(&self, label: HeaderLabel) -> Result<CellCoord, LayoutError> {
        self.get(label).ok_or_else(|| LayoutError::MissingHeader {
            label,
            sheet: self.sheet.clone(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Found labels in [`HeaderLabel::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (HeaderLabel, CellCoord)> + '_ {
        HeaderLabel::ALL
            .into_iter()
            .filter_map(|label| self.get(label).map(|coord| (label, coord)))
    }
}

/// Everything learned about a submission workbook before reading its rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub project_id: String,
    pub submission_type: SubmissionType,
    /// Header positions on the general information sheet
    pub general: HeaderLocations,
    /// Header positions on the submission-type sheet
    pub headers: HeaderLocations,
}

impl SheetLayout {
    /// Find the project ID and submission type on the general information sheet,
    /// then the column headers on the sheet named after the submission type.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MissingSheet` if either sheet is absent,
    /// `LayoutError::MissingHeader` if "Sample Type:" or "Project ID:" is not
    /// found, `LayoutError::MissingValue` if the cell below one of them is blank,
    /// or `LayoutError::UnknownSubmissionType` for an unrecognized sample type.
    pub fn locate(workbook: &Workbook, config: &LayoutConfig) -> Result<Self, LayoutError> {
        let general_sheet = workbook
            .sheet(GENERAL_SHEET_NAME)
            .ok_or_else(|| LayoutError::MissingSheet(GENERAL_SHEET_NAME.to_string()))?;

        let general = HeaderLocations::scan(
            general_sheet,
            config.general_sheet_length,
            config.general_sheet_width,
        );

        let project_id = value_below(general_sheet, &general, HeaderLabel::ProjectId)?;
        let sample_type = value_below(general_sheet, &general, HeaderLabel::SampleType)?;
        let submission_type = SubmissionType::parse(&sample_type)
            .ok_or(LayoutError::UnknownSubmissionType(sample_type))?;

        info!(
            project_id = %project_id,
            submission_type = %submission_type,
            "Excel parser initialized"
        );

        let detail_sheet = workbook
            .sheet(submission_type.sheet_name())
            .ok_or_else(|| LayoutError::MissingSheet(submission_type.sheet_name().to_string()))?;

        let headers = HeaderLocations::scan(
            detail_sheet,
            config.max_sheet_length,
            config.max_sheet_width,
        );

        for (label, coord) in headers.iter() {
            debug!(label = %label, coord = %coord, "Found header");
        }
        info!(found = headers.len(), "Found columns");

        Ok(Self {
            project_id,
            submission_type,
            general,
            headers,
        })
    }

    /// Location of a header on the submission-type sheet.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MissingHeader` if the label was not found.
    pub fn require(&self, label: HeaderLabel) -> Result<CellCoord, LayoutError> {
        self.headers.require(label)
    }
}

/// Text of the cell one row below `label`
fn value_below(
    sheet: &Worksheet,
    locations: &HeaderLocations,
    label: HeaderLabel,
) -> Result<String, LayoutError> {
    let coord = locations.require(label)?.below(1);
    sheet
        .value(coord)
        .map(str::to_string)
        .ok_or(LayoutError::MissingValue { label, coord })
}
