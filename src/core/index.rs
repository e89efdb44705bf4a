use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::validation::{first_invalid_base, MAX_INDEX_LENGTH};

/// Text used in place of an i5 sequence when a library is single-indexed.
/// Comparisons and reports use it so that two single-indexed libraries agree on i5.
pub const ABSENT_INDEX: &str = "None";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Non-base character in index: {0}")]
    InvalidBase(char),

    #[error("Empty index sequence")]
    Empty,

    #[error("Index sequence too long: {0} bases exceeds maximum of {MAX_INDEX_LENGTH}")]
    TooLong(usize),
}

/// A sample index (barcode) sequence made only of A, C, G, T and N
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexSequence(String);

impl IndexSequence {
    /// Validate `seq` exactly as given.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidBase` for the first character outside
    /// {A,C,G,T,N}, `IndexError::Empty` for an empty sequence, or
    /// `IndexError::TooLong` if the sequence exceeds `MAX_INDEX_LENGTH`.
    pub fn new(seq: impl Into<String>) -> Result<Self, IndexError> {
        let seq = seq.into();
        if seq.is_empty() {
            return Err(IndexError::Empty);
        }
        if let Some(c) = first_invalid_base(&seq) {
            return Err(IndexError::InvalidBase(c));
        }
        if seq.len() > MAX_INDEX_LENGTH {
            return Err(IndexError::TooLong(seq.len()));
        }
        Ok(Self(seq))
    }

    /// Validate a sequence typed by a person: surrounding whitespace is dropped
    /// and lowercase bases are accepted.
    ///
    /// # Errors
    ///
    /// Same as [`IndexSequence::new`].
    pub fn from_submitted(seq: &str) -> Result<Self, IndexError> {
        Self::new(seq.trim().to_ascii_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for IndexSequence {
    type Error = IndexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IndexSequence> for String {
    fn from(value: IndexSequence) -> Self {
        value.0
    }
}

impl AsRef<str> for IndexSequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IndexSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (i7, i5) index sequences that identify one library on a run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexPair {
    pub i7: IndexSequence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i5: Option<IndexSequence>,
}

impl IndexPair {
    #[must_use]
    pub fn new(i7: IndexSequence, i5: Option<IndexSequence>) -> Self {
        Self { i7, i5 }
    }

    /// i7 as compared during reconciliation
    #[must_use]
    pub fn i7_key(&self) -> &str {
        self.i7.as_str()
    }

    /// i5 as compared during reconciliation; [`ABSENT_INDEX`] when single-indexed
    #[must_use]
    pub fn i5_key(&self) -> &str {
        self.i5.as_ref().map_or(ABSENT_INDEX, IndexSequence::as_str)
    }
}

impl std::fmt::Display for IndexPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.i7_key(), self.i5_key())
    }
}
