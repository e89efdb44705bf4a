//! Extract run metadata from demultiplexed, gzip-compressed FASTQ files.
//!
//! Each file yields one [`CoreRecord`]: pool, sample, lane and read come from
//! the file name, while the flowcell and index sequences come from the
//! Illumina read headers of the first two records, e.g.
//!
//! ```text
//! @E00558:209:HMKJCCCXY:5:1101:10044:1379 1:N:0:NCTCGCTA+NTAGAGAG
//! ```
//!
//! The two headers must agree on the flowcell and the i7 index, otherwise the
//! file was not demultiplexed cleanly and is rejected. Disagreement on i5 is
//! only reported as a warning.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::fastq;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::index::{IndexError, IndexSequence};
use crate::core::records::CoreRecord;
use crate::core::types::IndexKind;
use crate::parsing::filename::{has_fastq_suffix, FastqFileName, FilenameError, FASTQ_SUFFIX};

/// Number of read headers compared for consistency
const HEADERS_CHECKED: usize = 2;

#[derive(Error, Debug)]
pub enum FastqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Fastq(String),

    #[error(transparent)]
    Filename(#[from] FilenameError),

    #[error("Expected at least {HEADERS_CHECKED} read headers, found {0}")]
    TooFewHeaders(usize),

    #[error("Malformed read header: '{0}'")]
    MalformedHeader(String),

    #[error("Non-base character in index: {0}")]
    InvalidBase(char),

    #[error("Invalid index: {0}")]
    InvalidIndex(IndexError),

    #[error("{0} indexes not demultiplexed")]
    IndexConsistency(IndexKind),

    #[error("Flowcell IDs are not consistent in this FASTQ: {first} vs {second}")]
    FlowcellConsistency { first: String, second: String },

    #[error("No {suffix} files in directory {}", dir.display())]
    NoFastqFiles { dir: PathBuf, suffix: String },

    #[error("Failed parsing {file}")]
    InFile {
        file: String,
        #[source]
        source: Box<FastqError>,
    },
}

impl From<IndexError> for FastqError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidBase(c) => Self::InvalidBase(c),
            other => Self::InvalidIndex(other),
        }
    }
}

impl FastqError {
    fn in_file(self, file: &str) -> Self {
        Self::InFile {
            file: file.to_string(),
            source: Box::new(self),
        }
    }

    /// The error without any per-file context
    #[must_use]
    pub fn root(&self) -> &FastqError {
        match self {
            Self::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// An Illumina (CASAVA 1.8+) read header, split on `:`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadHeader {
    pub instrument: String,
    pub run: String,
    pub flowcell: String,
    pub lane: String,
    /// Last `:` field: `i7` or `i7+i5`
    pub index: String,
}

impl ReadHeader {
    /// Parse a header line, with or without its leading `@`.
    ///
    /// # Errors
    ///
    /// Returns `FastqError::MalformedHeader` if the line has fewer than five
    /// `:` separated fields.
    pub fn parse(line: &str) -> Result<Self, FastqError> {
        let line = line.trim_end();
        let fields: Vec<&str> = line.strip_prefix('@').unwrap_or(line).split(':').collect();

        match fields.as_slice() {
            [instrument, run, flowcell, lane, .., index] => Ok(Self {
                instrument: (*instrument).to_string(),
                run: (*run).to_string(),
                flowcell: flowcell.trim().to_string(),
                lane: (*lane).to_string(),
                index: index.trim().to_string(),
            }),
            _ => Err(FastqError::MalformedHeader(line.to_string())),
        }
    }

    /// The i7 sequence and, for dual-indexed reads, the i5 sequence.
    ///
    /// # Errors
    ///
    /// Returns `FastqError::InvalidBase` if either sequence holds a character
    /// outside {A,C,G,T,N}.
    pub fn indexes(&self) -> Result<(IndexSequence, Option<IndexSequence>), FastqError> {
        match self.index.split_once('+') {
            Some((i7, i5)) => Ok((
                IndexSequence::new(i7.trim())?,
                Some(IndexSequence::new(i5.trim())?),
            )),
            None => Ok((IndexSequence::new(self.index.as_str())?, None)),
        }
    }
}

/// Flowcell and indexes agreed on by a file's read headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSummary {
    pub flowcell_id: String,
    pub i7: IndexSequence,
    pub i5: Option<IndexSequence>,
    /// Non-fatal inconsistencies, e.g. an i5 mismatch
    pub warnings: Vec<String>,
}

/// Check that the first two read headers describe the same flowcell and indexes.
///
/// Bases are validated for both headers before consistency is checked, so an
/// invalid base is always reported as `InvalidBase`.
///
/// # Errors
///
/// Returns `FastqError::TooFewHeaders`, `FastqError::InvalidBase`,
/// `FastqError::IndexConsistency` for an i7 mismatch or
/// `FastqError::FlowcellConsistency`.
pub fn summarize_headers(headers: &[ReadHeader]) -> Result<HeaderSummary, FastqError> {
    let [first, second, ..] = headers else {
        return Err(FastqError::TooFewHeaders(headers.len()));
    };

    let (i7_a, i5_a) = first.indexes()?;
    let (i7_b, i5_b) = second.indexes()?;

    if i7_a != i7_b {
        return Err(FastqError::IndexConsistency(IndexKind::I7));
    }

    let mut warnings = Vec::new();
    let i5 = if i5_a == i5_b {
        i5_a
    } else {
        let message = format!(
            "{} indexes not demultiplexed: {} vs {}",
            IndexKind::I5,
            i5_a.as_ref().map_or("none", IndexSequence::as_str),
            i5_b.as_ref().map_or("none", IndexSequence::as_str),
        );
        warn!("{message}");
        warnings.push(message);
        None
    };

    if first.flowcell != second.flowcell {
        return Err(FastqError::FlowcellConsistency {
            first: first.flowcell.clone(),
            second: second.flowcell.clone(),
        });
    }

    Ok(HeaderSummary {
        flowcell_id: first.flowcell.clone(),
        i7: i7_a,
        i5,
        warnings,
    })
}

/// Read up to `limit` read headers from a FASTQ stream
///
/// # Errors
///
/// Returns `FastqError::Fastq` if a record is malformed, or
/// `FastqError::MalformedHeader` if a header is not in Illumina form.
pub fn read_headers<R: BufRead>(inner: R, limit: usize) -> Result<Vec<ReadHeader>, FastqError> {
    let mut reader = fastq::io::Reader::new(inner);
    let mut headers = Vec::with_capacity(limit);

    for result in reader.records().take(limit) {
        let record =
            result.map_err(|e| FastqError::Fastq(format!("Failed to parse FASTQ record: {e}")))?;

        let name = String::from_utf8_lossy(record.name());
        let description = String::from_utf8_lossy(record.description());
        let line = if description.is_empty() {
            name.into_owned()
        } else {
            format!("{name} {description}")
        };

        headers.push(ReadHeader::parse(&line)?);
    }

    Ok(headers)
}

/// Read and check the headers of a gzip-compressed FASTQ file
///
/// # Errors
///
/// Returns `FastqError::Io` if the file cannot be read, or any error of
/// [`read_headers`] and [`summarize_headers`].
pub fn read_fastq_headers(path: &Path) -> Result<HeaderSummary, FastqError> {
    let file = File::open(path)?;
    let reader = BufReader::new(MultiGzDecoder::new(file));
    let headers = read_headers(reader, HEADERS_CHECKED)?;
    summarize_headers(&headers)
}

/// What to do when one file in a directory fails to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failing file
    #[default]
    Abort,
    /// Log the failure, skip the file and carry on
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Only files ending in this suffix are read
    pub suffix: String,
    pub on_error: ErrorPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            suffix: FASTQ_SUFFIX.to_string(),
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// A file left out of a scan under [`ErrorPolicy::Continue`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

/// Result of scanning one FASTQ directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastqScan {
    pub records: Vec<CoreRecord>,
    pub skipped: Vec<SkippedFile>,
    pub warnings: Vec<String>,
}

/// Builds [`CoreRecord`]s for every FASTQ file in one directory
pub struct FastqScanner {
    project_id: String,
    config: ScanConfig,
}

impl FastqScanner {
    pub fn new(project_id: impl Into<String>, config: ScanConfig) -> Self {
        Self {
            project_id: project_id.into(),
            config,
        }
    }

    /// Build the record for one FASTQ file.
    ///
    /// The file name is checked before the file is opened. The returned
    /// warnings are the non-fatal header inconsistencies found.
    ///
    /// # Errors
    ///
    /// Returns `FastqError` if the name or contents cannot be parsed; the
    /// error is not yet wrapped with the file name.
    pub fn parse_file(&self, path: &Path) -> Result<(CoreRecord, Vec<String>), FastqError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let name = FastqFileName::parse_with_suffix(&filename, &self.config.suffix)?;
        let headers = read_fastq_headers(path)?;

        let record = CoreRecord {
            project_id: self.project_id.clone(),
            pool_id: name.pool_id,
            sample_id: name.sample_id,
            flowcell_id: headers.flowcell_id,
            lane: name.lane,
            read: name.read,
            i7_index_sequence: headers.i7,
            i5_index_sequence: headers.i5,
            filename,
        };

        Ok((record, headers.warnings))
    }

    /// Parse every matching file directly inside `dir`, in file name order.
    ///
    /// Subdirectories are not searched.
    ///
    /// # Errors
    ///
    /// Returns `FastqError::Io` if the directory cannot be listed,
    /// `FastqError::NoFastqFiles` if nothing in it matches the suffix, or,
    /// under [`ErrorPolicy::Abort`], the first file failure wrapped in
    /// `FastqError::InFile`.
    pub fn scan(&self, dir: &Path) -> Result<FastqScan, FastqError> {
        let files = self.list_files(dir)?;
        if files.is_empty() {
            return Err(FastqError::NoFastqFiles {
                dir: dir.to_path_buf(),
                suffix: self.config.suffix.clone(),
            });
        }

        let mut scan = FastqScan::default();
        for (filename, path) in files {
            match self.parse_file(&path) {
                Ok((record, warnings)) => {
                    debug!(
                        file = %filename,
                        flowcell = %record.flowcell_id,
                        i7 = %record.i7_index_sequence,
                        "Parsed FASTQ"
                    );
                    scan.warnings
                        .extend(warnings.into_iter().map(|w| format!("{filename}: {w}")));
                    scan.records.push(record);
                }
                Err(e) => match self.config.on_error {
                    ErrorPolicy::Abort => return Err(e.in_file(&filename)),
                    ErrorPolicy::Continue => {
                        warn!(file = %filename, error = %e, "Skipping FASTQ file");
                        scan.skipped.push(SkippedFile {
                            filename,
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            parsed = scan.records.len(),
            skipped = scan.skipped.len(),
            "FASTQ files parsed"
        );
        Ok(scan)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>, FastqError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if has_fastq_suffix(&name, &self.config.suffix) {
                files.push((name, entry.path()));
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FASTQ: &str = "\
@E00558:209:HMKJCCCXY:5:1101:10044:1379 1:N:0:NCTCGCTA+NTAGAGAG
ACGTACGTAC
+
FFFFFFFFFF
@E00558:209:HMKJCCCXY:5:1101:10064:1379 1:N:0:NCTCGCTA+NTAGAGAG
ACGTACGTAC
+
FFFFFFFFFF
@E00558:209:HMKJCCCXY:5:1101:10085:1379 1:N:0:GGGGGGGG+TTTTTTTT
ACGTACGTAC
+
FFFFFFFFFF
";

    fn header(flowcell: &str, index: &str) -> ReadHeader {
        ReadHeader::parse(&format!("@E00558:209:{flowcell}:5:1101:10044:1379 1:N:0:{index}"))
            .unwrap()
    }

    #[test]
    fn test_parse_read_header() {
        let h = ReadHeader::parse("@E00558:209:HMKJCCCXY:5:1101:10044:1379 1:N:0:NCTCGCTA+NTAGAGAG\n")
            .unwrap();
        assert_eq!(h.instrument, "E00558");
        assert_eq!(h.run, "209");
        assert_eq!(h.flowcell, "HMKJCCCXY");
        assert_eq!(h.lane, "5");
        assert_eq!(h.index, "NCTCGCTA+NTAGAGAG");

        let (i7, i5) = h.indexes().unwrap();
        assert_eq!(i7.as_str(), "NCTCGCTA");
        assert_eq!(i5.unwrap().as_str(), "NTAGAGAG");
    }

    #[test]
    fn test_parse_read_header_single_index() {
        let h = header("HMKJCCCXY", "ATCACGTT");
        let (i7, i5) = h.indexes().unwrap();
        assert_eq!(i7.as_str(), "ATCACGTT");
        assert!(i5.is_none());
    }

    #[test]
    fn test_parse_read_header_malformed() {
        assert!(matches!(
            ReadHeader::parse("@read1"),
            Err(FastqError::MalformedHeader(_))
        ));
        assert!(matches!(
            ReadHeader::parse("@a:b:c:d"),
            Err(FastqError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_read_headers_takes_first_two() {
        let headers = read_headers(FASTQ.as_bytes(), 2).unwrap();
        assert_eq!(headers.len(), 2);
        assert!(headers.iter().all(|h| h.index == "NCTCGCTA+NTAGAGAG"));
    }

    #[test]
    fn test_summarize_consistent() {
        let headers = read_headers(FASTQ.as_bytes(), 2).unwrap();
        let summary = summarize_headers(&headers).unwrap();
        assert_eq!(summary.flowcell_id, "HMKJCCCXY");
        assert_eq!(summary.i7.as_str(), "NCTCGCTA");
        assert_eq!(summary.i5.unwrap().as_str(), "NTAGAGAG");
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_summarize_i7_mismatch() {
        let headers = [
            header("HMKJCCCXY", "NCTCGCTA+NTAGAGAG"),
            header("HMKJCCCXY", "ACTCGCTA+NTAGAGAG"),
        ];
        assert!(matches!(
            summarize_headers(&headers),
            Err(FastqError::IndexConsistency(IndexKind::I7))
        ));
    }

    #[test]
    fn test_summarize_i7_mismatch_regardless_of_i5() {
        let headers = [
            header("HMKJCCCXY", "NCTCGCTA"),
            header("HMKJCCCXY", "ACTCGCTA+NTAGAGAG"),
        ];
        assert!(matches!(
            summarize_headers(&headers),
            Err(FastqError::IndexConsistency(IndexKind::I7))
        ));
    }

    #[test]
    fn test_summarize_i5_mismatch_is_warning() {
        let headers = [
            header("HMKJCCCXY", "NCTCGCTA+NTAGAGAG"),
            header("HMKJCCCXY", "NCTCGCTA+ATAGAGAG"),
        ];
        let summary = summarize_headers(&headers).unwrap();
        assert_eq!(summary.i7.as_str(), "NCTCGCTA");
        assert!(summary.i5.is_none());
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].starts_with("i5 indexes not demultiplexed"));
    }

    #[test]
    fn test_summarize_flowcell_mismatch() {
        let headers = [
            header("HMKJCCCXY", "NCTCGCTA"),
            header("HMKJCCCXZ", "NCTCGCTA"),
        ];
        assert!(matches!(
            summarize_headers(&headers),
            Err(FastqError::FlowcellConsistency { .. })
        ));
    }

    #[test]
    fn test_summarize_invalid_base() {
        let headers = [
            header("HMKJCCCXY", "NCTCGCTA+NTAGAGAG"),
            header("HMKJCCCXY", "NCTCGCTA+NTAGXGAG"),
        ];
        assert!(matches!(
            summarize_headers(&headers),
            Err(FastqError::InvalidBase('X'))
        ));
    }

    #[test]
    fn test_summarize_too_few() {
        let headers = [header("HMKJCCCXY", "NCTCGCTA")];
        assert!(matches!(
            summarize_headers(&headers),
            Err(FastqError::TooFewHeaders(1))
        ));
    }

    #[test]
    fn test_error_root() {
        let err = FastqError::IndexConsistency(IndexKind::I7).in_file("a.fastq.gz");
        assert_eq!(err.to_string(), "Failed parsing a.fastq.gz");
        assert!(matches!(
            err.root(),
            FastqError::IndexConsistency(IndexKind::I7)
        ));
    }

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert_eq!(config.suffix, ".fastq.gz");
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }
}
