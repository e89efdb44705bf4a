//! Read tube and component records out of a located submission sheet.
//!
//! Data rows start two rows below a table's anchor header; the row directly
//! under the header is the template's worked example and is skipped. Rows are
//! read until the anchor column is blank or a per-table row limit is reached.
//!
//! | Submission type | Table | Anchor | Produces |
//! |-----------------|-------|--------|----------|
//! | Individual Libraries | sample table | Tube ID | one tube + one component per row |
//! | Pooled Libraries | Pool Information | Tube ID | one tube per row |
//! | Pooled Libraries | Indexing Information | Pool Name | one component per row |
//!
//! Extraction is all-or-nothing: records are only returned once every table of
//! the document has been read without error.
//!
//! Index cells holding a placeholder (`N/A`, `-`, `None`, `null`) are read as
//! no index. Any other text that is not a valid sequence fails the table.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::index::{IndexError, IndexSequence};
use crate::core::records::{ComponentRecord, TubeRecord};
use crate::core::types::{CellCoord, SubmissionType};
use crate::parsing::layout::{HeaderLabel, LayoutError, SheetLayout};
use crate::parsing::workbook::{Workbook, Worksheet};
use crate::utils::validation::is_index_placeholder;

/// Rows skipped between an anchor header and the first data row
const EXAMPLE_ROW_OFFSET: u32 = 2;

/// Which table was being read when extraction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    IndividualLibraries,
    PoolInformation,
    IndexingInformation,
}

impl std::fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndividualLibraries => write!(f, "individual libraries"),
            Self::PoolInformation => write!(f, "pool information"),
            Self::IndexingInformation => write!(f, "indexing information"),
        }
    }
}

/// A table could not be read; `source` holds the row-level cause
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed extracting {stage}")]
pub struct ExtractionError {
    pub stage: ExtractionStage,
    #[source]
    pub source: RowError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Row {row}: '{label}' is empty")]
    MissingValue { row: u32, label: HeaderLabel },

    #[error("Row {row}: invalid '{label}' value '{value}'")]
    InvalidIndex {
        row: u32,
        label: HeaderLabel,
        value: String,
        #[source]
        source: IndexError,
    },
}

/// How far past each table's anchor rows are read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionLimits {
    pub individual_rows: u32,
    pub pool_rows: u32,
    pub indexing_rows: u32,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            individual_rows: 100,
            pool_rows: 20,
            indexing_rows: 500,
        }
    }
}

/// Everything extracted from one submission document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub project_id: String,
    pub submission_type: SubmissionType,
    pub tubes: Vec<TubeRecord>,
    pub components: Vec<ComponentRecord>,
}

/// Header columns of one table, resolved up front so a missing header fails
/// before any row is read
struct Columns<'a> {
    sheet: &'a Worksheet,
    layout: &'a SheetLayout,
}

impl<'a> Columns<'a> {
    fn column(&self, label: HeaderLabel) -> Result<u32, RowError> {
        Ok(self.layout.require(label)?.column)
    }

    fn optional(&self, row: u32, label: HeaderLabel) -> Result<Option<String>, RowError> {
        let column = self.column(label)?;
        Ok(self
            .sheet
            .value(CellCoord::new(column, row))
            .map(str::to_string))
    }

    fn required(&self, row: u32, label: HeaderLabel) -> Result<String, RowError> {
        self.optional(row, label)?
            .ok_or(RowError::MissingValue { row, label })
    }

    /// Placeholder text such as `N/A` or `-` reads as no index
    fn index(&self, row: u32, label: HeaderLabel) -> Result<Option<IndexSequence>, RowError> {
        self.optional(row, label)?
            .filter(|value| !is_index_placeholder(value))
            .map(|value| {
                IndexSequence::from_submitted(&value).map_err(|source| RowError::InvalidIndex {
                    row,
                    label,
                    value,
                    source,
                })
            })
            .transpose()
    }

    fn required_index(&self, row: u32, label: HeaderLabel) -> Result<IndexSequence, RowError> {
        self.index(row, label)?
            .ok_or(RowError::MissingValue { row, label })
    }

    /// Data rows under `anchor`: from two rows below it, up to `limit` rows past
    /// it, stopping before the first blank anchor cell
    fn data_rows(&self, anchor: HeaderLabel, limit: u32) -> Result<Vec<u32>, RowError> {
        let anchor = self.layout.require(anchor)?;
        let first = anchor.row.saturating_add(EXAMPLE_ROW_OFFSET);
        let end = anchor.row.saturating_add(limit);

        Ok((first..end)
            .take_while(|&row| !self.sheet.is_blank(CellCoord::new(anchor.column, row)))
            .collect())
    }

    /// Fail early if any header a table uses is missing
    fn require_all(&self, labels: &[HeaderLabel]) -> Result<(), RowError> {
        for &label in labels {
            self.column(label)?;
        }
        Ok(())
    }
}

/// Extracts records from a workbook whose layout has been located
pub struct SubmissionExtractor<'a> {
    sheet: &'a Worksheet,
    layout: &'a SheetLayout,
    limits: ExtractionLimits,
}

impl<'a> SubmissionExtractor<'a> {
    /// Create an extractor for the submission-type sheet named by `layout`.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MissingSheet` if the workbook has no sheet for
    /// the layout's submission type.
    pub fn new(
        workbook: &'a Workbook,
        layout: &'a SheetLayout,
        limits: ExtractionLimits,
    ) -> Result<Self, LayoutError> {
        let name = layout.submission_type.sheet_name();
        let sheet = workbook
            .sheet(name)
            .ok_or_else(|| LayoutError::MissingSheet(name.to_string()))?;
        Ok(Self {
            sheet,
            layout,
            limits,
        })
    }

    /// Extract the records for the layout's submission type
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` naming the table that failed.
    pub fn extract(&self) -> Result<Submission, ExtractionError> {
        let (tubes, components) = match self.layout.submission_type {
            SubmissionType::IndividualLibraries => self.extract_individual_libraries()?,
            SubmissionType::PooledLibraries => self.extract_pooled_libraries()?,
        };

        Ok(Submission {
            project_id: self.layout.project_id.clone(),
            submission_type: self.layout.submission_type,
            tubes,
            components,
        })
    }

    fn columns(&self) -> Columns<'_> {
        Columns {
            sheet: self.sheet,
            layout: self.layout,
        }
    }

    /// One tube and one component per row of the sample table.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` with stage `IndividualLibraries` if a header
    /// is missing or a row holds an empty identifier or an invalid index.
    pub fn extract_individual_libraries(
        &self,
    ) -> Result<(Vec<TubeRecord>, Vec<ComponentRecord>), ExtractionError> {
        self.individual_rows().map_err(|source| ExtractionError {
            stage: ExtractionStage::IndividualLibraries,
            source,
        })
    }

    fn individual_rows(&self) -> Result<(Vec<TubeRecord>, Vec<ComponentRecord>), RowError> {
        use HeaderLabel::{
            Concentration, I5IndexName, I5IndexSequence, I7IndexName, I7IndexSequence,
            LibraryId, TubeId, Volume,
        };

        let cols = self.columns();
        cols.require_all(&[
            TubeId,
            LibraryId,
            Volume,
            Concentration,
            I7IndexName,
            I7IndexSequence,
            I5IndexName,
            I5IndexSequence,
        ])?;

        let project_id = &self.layout.project_id;
        let mut tubes = Vec::new();
        let mut components = Vec::new();

        for row in cols.data_rows(TubeId, self.limits.individual_rows)? {
            let mut tube = TubeRecord::new(project_id.as_str(), cols.required(row, TubeId)?);
            tube.volume = cols.optional(row, Volume)?;
            tube.concentration = cols.optional(row, Concentration)?;

            let component = ComponentRecord {
                project_id: project_id.clone(),
                pool_id: None,
                sample_id: cols.required(row, LibraryId)?,
                i7_index_name: cols.optional(row, I7IndexName)?,
                i7_index_sequence: cols.required_index(row, I7IndexSequence)?,
                i5_index_name: cols.optional(row, I5IndexName)?,
                i5_index_sequence: cols.index(row, I5IndexSequence)?,
            };

            debug!(row, tube = %tube.tube_id, sample = %component.sample_id, "Extracted row");
            tubes.push(tube);
            components.push(component);
        }

        info!(
            tubes = tubes.len(),
            components = components.len(),
            "Individual library columns extracted"
        );
        Ok((tubes, components))
    }

    /// Tubes from the "Pool Information" table and components from the
    /// "Indexing Information" table.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` with stage `PoolInformation` or
    /// `IndexingInformation` for the table that failed.
    pub fn extract_pooled_libraries(
        &self,
    ) -> Result<(Vec<TubeRecord>, Vec<ComponentRecord>), ExtractionError> {
        let tubes = self.pool_rows().map_err(|source| ExtractionError {
            stage: ExtractionStage::PoolInformation,
            source,
        })?;
        let components = self.indexing_rows().map_err(|source| ExtractionError {
            stage: ExtractionStage::IndexingInformation,
            source,
        })?;

        info!(
            tubes = tubes.len(),
            components = components.len(),
            "Pooled library columns extracted"
        );
        Ok((tubes, components))
    }

    fn pool_rows(&self) -> Result<Vec<TubeRecord>, RowError> {
        use HeaderLabel::{
            Amount, Buffer, Concentration, Organism, PoolNames, Quantitation, TubeId, Volume,
        };

        let cols = self.columns();
        cols.require_all(&[
            TubeId,
            PoolNames,
            Volume,
            Concentration,
            Amount,
            Quantitation,
            Buffer,
            Organism,
        ])?;

        let mut tubes = Vec::new();
        for row in cols.data_rows(TubeId, self.limits.pool_rows)? {
            let mut tube =
                TubeRecord::new(self.layout.project_id.as_str(), cols.required(row, TubeId)?);
            tube.pool_id = cols.optional(row, PoolNames)?;
            tube.volume = cols.optional(row, Volume)?;
            tube.concentration = cols.optional(row, Concentration)?;
            tube.total_amount = cols.optional(row, Amount)?;
            tube.quantitation_method = cols.optional(row, Quantitation)?;
            tube.buffer = cols.optional(row, Buffer)?;
            tube.organism = cols.optional(row, Organism)?;

            debug!(row, tube = %tube.tube_id, "Extracted pool row");
            tubes.push(tube);
        }
        Ok(tubes)
    }

    fn indexing_rows(&self) -> Result<Vec<ComponentRecord>, RowError> {
        use HeaderLabel::{
            I5IndexName, I5IndexSequence, I7IndexName, I7IndexSequence, LibraryId, PoolName,
        };

        let cols = self.columns();
        cols.require_all(&[
            PoolName,
            LibraryId,
            I7IndexName,
            I7IndexSequence,
            I5IndexName,
            I5IndexSequence,
        ])?;

        let mut components = Vec::new();
        for row in cols.data_rows(PoolName, self.limits.indexing_rows)? {
            let component = ComponentRecord {
                project_id: self.layout.project_id.clone(),
                pool_id: cols.optional(row, PoolName)?,
                sample_id: cols.required(row, LibraryId)?,
                i7_index_name: cols.optional(row, I7IndexName)?,
                i7_index_sequence: cols.required_index(row, I7IndexSequence)?,
                i5_index_name: cols.optional(row, I5IndexName)?,
                i5_index_sequence: cols.index(row, I5IndexSequence)?,
            };

            debug!(row, sample = %component.sample_id, "Extracted indexing row");
            components.push(component);
        }
        Ok(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::layout::{LayoutConfig, GENERAL_SHEET_NAME};

    fn general_sheet(sample_type: &str) -> Worksheet {
        Worksheet::from_rows(
            GENERAL_SHEET_NAME,
            [
                vec!["", "", ""],
                vec!["", "Project ID:", "Sample Type:"],
                vec!["", "123456", sample_type],
            ],
        )
    }

    /// Lay `rows` out on `sheet` starting at column 2, row `start`
    fn put_rows(sheet: &mut Worksheet, start: u32, rows: &[&[&str]]) {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let coord = CellCoord::new(2 + c as u32, start + r as u32);
                sheet.set(coord, value);
            }
        }
    }

    const INDIVIDUAL_HEADER: &[&str] = &[
        "Tube ID",
        "Individual Library ID",
        "Library Prep",
        "Volume (ul)",
        "Concentration (ng/ul)",
        "Size",
        "Dilution",
        "i7 Index Name",
        "i7 Index Sequence",
        "i5 Index Name",
        "i5 Index Sequence",
        "Priority",
    ];

    fn individual_workbook(data: &[&[&str]]) -> Workbook {
        let mut sheet = Worksheet::new("Individual Libraries");
        put_rows(&mut sheet, 8, &[INDIVIDUAL_HEADER]);
        put_rows(
            &mut sheet,
            9,
            &[&["e.g. 0", "EXAMPLE", "", "10", "1", "", "", "N701", "TAAGGCGA", "S502", "CTCTCTAT"]],
        );
        put_rows(&mut sheet, 10, data);

        Workbook::new()
            .with_sheet(general_sheet("Individual Libraries"))
            .with_sheet(sheet)
    }

    fn pooled_workbook(pools: &[&[&str]], indexes: &[&[&str]]) -> Workbook {
        let mut sheet = Worksheet::new("Pooled Libraries");
        put_rows(
            &mut sheet,
            12,
            &[&[
                "Tube ID",
                "Pool Names",
                "Volume (ul)",
                "Concentration (ng/ul)",
                "Total Amount (ug)",
                "Quantitation Method",
                "Buffer (TE or Water)",
                "Organism",
            ]],
        );
        put_rows(&mut sheet, 14, pools);
        put_rows(
            &mut sheet,
            35,
            &[&[
                "Pool Name",
                "Individual Library ID",
                "Library Prep",
                "Size",
                "Dilution",
                "i7 Index Name",
                "i7 Index Sequence",
                "i5 Index Name",
                "i5 Index Sequence",
            ]],
        );
        put_rows(&mut sheet, 37, indexes);

        Workbook::new()
            .with_sheet(general_sheet("Pooled Libraries"))
            .with_sheet(sheet)
    }

    fn extract(workbook: &Workbook) -> Result<Submission, ExtractionError> {
        let layout = SheetLayout::locate(workbook, &LayoutConfig::default()).unwrap();
        SubmissionExtractor::new(workbook, &layout, ExtractionLimits::default())
            .unwrap()
            .extract()
    }

    const SAM1: &[&str] = &[
        "1", "SAM1", "Nextera XT 1", "11", "1", "301", "351", "ALL-C", "CCCCCCCC", "ALL-G",
        "GGGGGGGG",
    ];
    const SAM2: &[&str] = &[
        "2", "SAM2", "Nextera XT 2", "12", "2", "302", "352", "ALL-A", "AAAAAAA", "ALL-T",
        "TTTTTTTT",
    ];
    const SAM3: &[&str] = &[
        "3", "SAM3", "Nextera XT 3", "13", "3", "302", "353", "ALL-T", "TTTTTTT", "ALL-A",
        "AAAAAAA",
    ];

    #[test]
    fn test_individual_libraries() {
        let workbook = individual_workbook(&[SAM1, SAM2, SAM3]);
        let submission = extract(&workbook).unwrap();

        assert_eq!(submission.project_id, "123456");
        assert_eq!(
            submission.submission_type,
            SubmissionType::IndividualLibraries
        );
        assert_eq!(submission.tubes.len(), 3);
        assert_eq!(submission.components.len(), 3);

        let tube = &submission.tubes[1];
        assert_eq!(tube.project_id, "123456");
        assert_eq!(tube.tube_id, "2");
        assert_eq!(tube.volume.as_deref(), Some("12"));
        assert_eq!(tube.concentration.as_deref(), Some("2"));
        assert_eq!(tube.pool_id, None);

        let component = &submission.components[1];
        assert_eq!(component.sample_id, "SAM2");
        assert_eq!(component.i7_index_name.as_deref(), Some("ALL-A"));
        assert_eq!(component.i7_index_sequence.as_str(), "AAAAAAA");
        assert_eq!(component.i5_index_name.as_deref(), Some("ALL-T"));
        assert_eq!(
            component.i5_index_sequence.as_ref().map(IndexSequence::as_str),
            Some("TTTTTTTT")
        );
    }

    #[test]
    fn test_individual_stops_at_first_blank_anchor() {
        // Two rows, a blank row, then a row that must not be read
        let workbook = individual_workbook(&[SAM1, SAM2, &[""], SAM3]);
        let submission = extract(&workbook).unwrap();

        assert_eq!(submission.tubes.len(), 2);
        assert_eq!(submission.components.len(), 2);
        assert!(submission.components.iter().all(|c| c.sample_id != "SAM3"));
    }

    #[test]
    fn test_individual_skips_example_row() {
        let workbook = individual_workbook(&[SAM1]);
        let submission = extract(&workbook).unwrap();
        assert_eq!(submission.components.len(), 1);
        assert_eq!(submission.components[0].sample_id, "SAM1");
    }

    #[test]
    fn test_individual_missing_header() {
        let mut workbook = individual_workbook(&[SAM1]);
        let mut sheet = workbook.sheet("Individual Libraries").unwrap().clone();
        // Remove the "i7 Index Sequence" header
        sheet.set(CellCoord::new(10, 8), "");
        workbook.add_sheet(sheet);

        let err = extract(&workbook).unwrap_err();
        assert_eq!(err.stage, ExtractionStage::IndividualLibraries);
        assert!(matches!(
            err.source,
            RowError::Layout(LayoutError::MissingHeader {
                label: HeaderLabel::I7IndexSequence,
                ..
            })
        ));
    }

    #[test]
    fn test_individual_invalid_index_fails_whole_sheet() {
        let bad: &[&str] = &[
            "2", "SAM2", "", "12", "2", "", "", "ALL-A", "AAXAAAA", "ALL-T", "TTTTTTTT",
        ];
        let workbook = individual_workbook(&[SAM1, bad, SAM3]);

        let err = extract(&workbook).unwrap_err();
        assert_eq!(err.stage, ExtractionStage::IndividualLibraries);
        assert_eq!(
            err.source,
            RowError::InvalidIndex {
                row: 11,
                label: HeaderLabel::I7IndexSequence,
                value: "AAXAAAA".to_string(),
                source: IndexError::InvalidBase('X'),
            }
        );
    }

    #[test]
    fn test_individual_missing_sample_id() {
        let bad: &[&str] = &["2", "", "", "12", "2", "", "", "ALL-A", "AAAAAAA"];
        let workbook = individual_workbook(&[bad]);

        let err = extract(&workbook).unwrap_err();
        assert_eq!(
            err.source,
            RowError::MissingValue {
                row: 10,
                label: HeaderLabel::LibraryId,
            }
        );
    }

    #[test]
    fn test_individual_single_index() {
        let single: &[&str] = &["1", "SAM1", "", "11", "1", "", "", "ALL-C", "cccccccc"];
        let workbook = individual_workbook(&[single]);

        let submission = extract(&workbook).unwrap();
        let component = &submission.components[0];
        assert_eq!(component.i7_index_sequence.as_str(), "CCCCCCCC");
        assert_eq!(component.i5_index_name, None);
        assert_eq!(component.i5_index_sequence, None);
    }

    #[test]
    fn test_individual_row_limit() {
        let rows: Vec<Vec<String>> = (1..=10)
            .map(|i| vec![i.to_string(), format!("SAM{i}"), String::new(), String::new(),
                          String::new(), String::new(), String::new(), String::new(),
                          "ACGT".to_string()])
            .collect();
        let refs: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
        let workbook = individual_workbook(&slices);

        let layout = SheetLayout::locate(&workbook, &LayoutConfig::default()).unwrap();
        let limits = ExtractionLimits {
            individual_rows: 6,
            ..ExtractionLimits::default()
        };
        let submission = SubmissionExtractor::new(&workbook, &layout, limits)
            .unwrap()
            .extract()
            .unwrap();
        // Anchor row 8: data rows 10..14
        assert_eq!(submission.components.len(), 4);
    }

    #[test]
    fn test_individual_index_placeholders() {
        let placeholder_i5: &[&str] = &[
            "1", "SAM1", "", "11", "1", "", "", "D701", "ATTACTCG", "", "N/A",
        ];
        let dash_i5: &[&str] = &["2", "SAM2", "", "12", "2", "", "", "D702", "TCCGGAGA", "", "-"];
        let submission = extract(&individual_workbook(&[placeholder_i5, dash_i5])).unwrap();

        assert_eq!(submission.components.len(), 2);
        assert!(submission
            .components
            .iter()
            .all(|c| c.i5_index_sequence.is_none()));
    }

    #[test]
    fn test_placeholder_i7_is_missing() {
        let row: &[&str] = &["1", "SAM1", "", "11", "1", "", "", "D701", "n/a"];
        let err = extract(&individual_workbook(&[row])).unwrap_err();
        assert_eq!(
            err.source,
            RowError::MissingValue {
                row: 10,
                label: HeaderLabel::I7IndexSequence,
            }
        );
    }

    const POOL1: &[&str] = &["1", "Pool1", "11", "51", "0.1", "Qubit1", "water1", "human1"];
    const POOL2: &[&str] = &["2", "Pool2", "12", "52", "0.2", "Qubit2", "water2", "human2"];

    const COMP1: &[&str] = &[
        "Pool1", "SAM1", "Nextera XT 1", "301", "351", "ALL-C", "CCCCCCCC", "ALL-G", "GGGGGGGG",
    ];
    const COMP2: &[&str] = &[
        "Pool2", "SAM2", "Nextera XT 2", "302", "352", "ALL-A", "AAAAAAA", "ALL-T", "TTTTTTTT",
    ];
    const COMP3: &[&str] = &[
        "Pool3", "SAM3", "Nextera XT 3", "302", "353", "ALL-T", "TTTTTTT", "ALL-A", "AAAAAAA",
    ];

    #[test]
    fn test_pooled_libraries() {
        let workbook = pooled_workbook(&[POOL1, POOL2], &[COMP1, COMP2, COMP3]);
        let submission = extract(&workbook).unwrap();

        assert_eq!(submission.submission_type, SubmissionType::PooledLibraries);
        assert_eq!(submission.tubes.len(), 2);
        assert_eq!(submission.components.len(), 3);

        let tube = &submission.tubes[0];
        assert_eq!(tube.tube_id, "1");
        assert_eq!(tube.pool_id.as_deref(), Some("Pool1"));
        assert_eq!(tube.volume.as_deref(), Some("11"));
        assert_eq!(tube.concentration.as_deref(), Some("51"));
        assert_eq!(tube.total_amount.as_deref(), Some("0.1"));
        assert_eq!(tube.quantitation_method.as_deref(), Some("Qubit1"));
        assert_eq!(tube.buffer.as_deref(), Some("water1"));
        assert_eq!(tube.organism.as_deref(), Some("human1"));

        let component = &submission.components[2];
        assert_eq!(component.project_id, "123456");
        assert_eq!(component.pool_id.as_deref(), Some("Pool3"));
        assert_eq!(component.sample_id, "SAM3");
        assert_eq!(component.i7_index_sequence.as_str(), "TTTTTTT");
        assert_eq!(component.i5_index_name.as_deref(), Some("ALL-A"));
    }

    #[test]
    fn test_unbounded_limits_stop_at_blank_anchor() {
        let workbook = pooled_workbook(&[POOL1, POOL2], &[COMP1, COMP2, COMP3]);
        let layout = SheetLayout::locate(&workbook, &LayoutConfig::default()).unwrap();
        let limits = ExtractionLimits {
            individual_rows: u32::MAX,
            pool_rows: u32::MAX,
            indexing_rows: u32::MAX,
        };

        let submission = SubmissionExtractor::new(&workbook, &layout, limits)
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(submission.tubes.len(), 2);
        assert_eq!(submission.components.len(), 3);
    }

    #[test]
    fn test_pooled_tables_stop_independently() {
        let workbook = pooled_workbook(
            &[POOL1, &[""], POOL2],
            &[COMP1, COMP2, &[""], COMP3],
        );
        let submission = extract(&workbook).unwrap();
        assert_eq!(submission.tubes.len(), 1);
        assert_eq!(submission.components.len(), 2);
    }

    #[test]
    fn test_pooled_indexing_failure_commits_nothing() {
        let bad: &[&str] = &["Pool2", "SAM2", "", "", "", "ALL-A", "", "ALL-T", "TTTTTTTT"];
        let workbook = pooled_workbook(&[POOL1, POOL2], &[COMP1, bad]);

        let err = extract(&workbook).unwrap_err();
        assert_eq!(err.stage, ExtractionStage::IndexingInformation);
        assert_eq!(
            err.source,
            RowError::MissingValue {
                row: 38,
                label: HeaderLabel::I7IndexSequence,
            }
        );
        assert_eq!(err.to_string(), "Failed extracting indexing information");
    }

    #[test]
    fn test_pooled_missing_pool_header() {
        let mut workbook = pooled_workbook(&[POOL1], &[COMP1]);
        let mut sheet = workbook.sheet("Pooled Libraries").unwrap().clone();
        // Remove "Organism" from the pool table header
        sheet.set(CellCoord::new(9, 12), "");
        workbook.add_sheet(sheet);

        let err = extract(&workbook).unwrap_err();
        assert_eq!(err.stage, ExtractionStage::PoolInformation);
    }

    #[test]
    fn test_extractor_missing_sheet() {
        let workbook = pooled_workbook(&[POOL1], &[COMP1]);
        let layout = SheetLayout::locate(&workbook, &LayoutConfig::default()).unwrap();
        let without_detail = Workbook::new().with_sheet(general_sheet("Pooled Libraries"));

        let result = SubmissionExtractor::new(&without_detail, &layout, ExtractionLimits::default());
        assert!(matches!(result, Err(LayoutError::MissingSheet(_))));
    }
}
