//! Parse Illumina `bcl2fastq` style FASTQ file names.
//!
//! Files from the core facility are named
//! `<prefix>_S<n>_L<lane>_R<read>_<chunk>.fastq.gz`, where the last
//! `-`-separated tokens of the prefix are the pool and sample identifiers,
//! e.g. `17127FL-27-02-Pool4-A1_S193_L005_R1_001.fastq.gz` is sample `A1` of
//! pool `Pool4`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::ReadDirection;

/// Suffix of compressed FASTQ files produced by the facility
pub const FASTQ_SUFFIX: &str = ".fastq.gz";

lazy_static! {
    static ref ILLUMINA_STEM_REGEX: Regex =
        Regex::new(r"^(.+)_S(\d+)_(L\d+)_(R[12])_(\d+)$").expect("valid regex");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("'{filename}' does not end in {suffix}")]
    Suffix { filename: String, suffix: String },

    #[error("'{0}' does not match <pool>-<sample>_S<n>_L<lane>_R<read>_<chunk>")]
    Shape(String),

    #[error("'{0}' has no pool and sample tokens before the sample number")]
    MissingIds(String),
}

/// Identifiers encoded in one FASTQ file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastqFileName {
    pub pool_id: String,
    pub sample_id: String,
    /// The `S<n>` sample number assigned by the demultiplexer
    pub sample_number: u32,
    /// Lane token, e.g. `L004`
    pub lane: String,
    pub read: ReadDirection,
    /// Chunk number, e.g. 1 for `_001`
    pub chunk: u32,
}

impl FastqFileName {
    /// Parse a bare file name (no directory components).
    ///
    /// # Errors
    ///
    /// Returns `FilenameError` if the name lacks the FASTQ suffix, does not
    /// follow the Illumina naming pattern, or has fewer than two `-` separated
    /// identifiers before the sample number.
    ///
    /// # Examples
    ///
    /// ```
    /// use seq_reconcile::core::types::ReadDirection;
    /// use seq_reconcile::parsing::filename::FastqFileName;
    ///
    /// let name = FastqFileName::parse("pool-SAM2_S1_L004_R1_001.fastq.gz").unwrap();
    /// assert_eq!(name.pool_id, "pool");
    /// assert_eq!(name.sample_id, "SAM2");
    /// assert_eq!(name.lane, "L004");
    /// assert_eq!(name.read, ReadDirection::R1);
    /// ```
    pub fn parse(filename: &str) -> Result<Self, FilenameError> {
        Self::parse_with_suffix(filename, FASTQ_SUFFIX)
    }

    /// Parse a file name whose compression suffix is `suffix` instead of
    /// `.fastq.gz`.
    ///
    /// # Errors
    ///
    /// Same as [`FastqFileName::parse`].
    pub fn parse_with_suffix(filename: &str, suffix: &str) -> Result<Self, FilenameError> {
        let stem = filename
            .strip_suffix(suffix)
            .ok_or_else(|| FilenameError::Suffix {
                filename: filename.to_string(),
                suffix: suffix.to_string(),
            })?;

        let caps = ILLUMINA_STEM_REGEX
            .captures(stem)
            .ok_or_else(|| FilenameError::Shape(filename.to_string()))?;
        let shape = || FilenameError::Shape(filename.to_string());

        // Only the last underscore-separated token of the prefix carries ids
        let prefix = caps[1].rsplit('_').next().unwrap_or_default();
        let mut ids = prefix.rsplit('-');
        let sample_id = ids.next().filter(|s| !s.is_empty());
        let pool_id = ids.next().filter(|s| !s.is_empty());
        let (Some(sample_id), Some(pool_id)) = (sample_id, pool_id) else {
            return Err(FilenameError::MissingIds(filename.to_string()));
        };

        Ok(Self {
            pool_id: pool_id.to_string(),
            sample_id: sample_id.to_string(),
            sample_number: caps[2].parse().map_err(|_| shape())?,
            lane: caps[3].to_string(),
            read: ReadDirection::parse(&caps[4]).ok_or_else(shape)?,
            chunk: caps[5].parse().map_err(|_| shape())?,
        })
    }
}

/// Whether a directory entry name looks like a FASTQ file to process
#[must_use]
pub fn has_fastq_suffix(filename: &str, suffix: &str) -> bool {
    filename.len() > suffix.len() && filename.ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let name = FastqFileName::parse("pool-SAM2_S1_L004_R1_001.fastq.gz").unwrap();
        assert_eq!(
            name,
            FastqFileName {
                pool_id: "pool".to_string(),
                sample_id: "SAM2".to_string(),
                sample_number: 1,
                lane: "L004".to_string(),
                read: ReadDirection::R1,
                chunk: 1,
            }
        );
    }

    #[test]
    fn test_parse_facility_name() {
        let name =
            FastqFileName::parse("17127FL-27-02-bkbk12-A1_S193_L005_R2_001.fastq.gz").unwrap();
        assert_eq!(name.pool_id, "bkbk12");
        assert_eq!(name.sample_id, "A1");
        assert_eq!(name.sample_number, 193);
        assert_eq!(name.lane, "L005");
        assert_eq!(name.read, ReadDirection::R2);
    }

    #[test]
    fn test_parse_underscore_in_prefix() {
        let name = FastqFileName::parse("run_7_Pool1-SAM1_S2_L001_R2_003.fastq.gz").unwrap();
        assert_eq!(name.pool_id, "Pool1");
        assert_eq!(name.sample_id, "SAM1");
        assert_eq!(name.chunk, 3);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FastqFileName::parse("pool-SAM2_S1_L004_R1_001.fastq"),
            Err(FilenameError::Suffix { .. })
        ));
        assert!(matches!(
            FastqFileName::parse("pool-SAM2_S1_L004_I1_001.fastq.gz"),
            Err(FilenameError::Shape(_))
        ));
        assert!(matches!(
            FastqFileName::parse("pool-SAM2_S1_R1_001.fastq.gz"),
            Err(FilenameError::Shape(_))
        ));
        assert!(matches!(
            FastqFileName::parse("SAM2_S1_L004_R1_001.fastq.gz"),
            Err(FilenameError::MissingIds(_))
        ));
        assert!(matches!(
            FastqFileName::parse("-SAM2_S1_L004_R1_001.fastq.gz"),
            Err(FilenameError::MissingIds(_))
        ));
    }

    #[test]
    fn test_parse_with_suffix() {
        let name = FastqFileName::parse_with_suffix("Pool1-SAM1_S1_L001_R2_001.fq.gz", ".fq.gz")
            .unwrap();
        assert_eq!(name.sample_id, "SAM1");
        assert_eq!(name.read, ReadDirection::R2);
    }

    #[test]
    fn test_has_fastq_suffix() {
        assert!(has_fastq_suffix("a_S1_L001_R1_001.fastq.gz", FASTQ_SUFFIX));
        assert!(!has_fastq_suffix(".fastq.gz", FASTQ_SUFFIX));
        assert!(!has_fastq_suffix("a.fastq", FASTQ_SUFFIX));
        assert!(!has_fastq_suffix("a.fastq.gz.md5", FASTQ_SUFFIX));
    }
}
