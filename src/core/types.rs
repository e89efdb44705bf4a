use serde::{Deserialize, Serialize};

/// Which submission form the customer filled in.
///
/// The value is read from the "Sample Type:" cell of the general information
/// sheet, and names the worksheet holding the sample table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    /// One tube per library, one library per row
    IndividualLibraries,
    /// Tubes hold pools; libraries are listed separately in an indexing table
    PooledLibraries,
}

impl SubmissionType {
    /// Name of the worksheet (and of the "Sample Type:" value) for this submission type
    #[must_use]
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::IndividualLibraries => "Individual Libraries",
            Self::PooledLibraries => "Pooled Libraries",
        }
    }

    /// Parse the value found in the "Sample Type:" cell
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Individual Libraries" => Some(Self::IndividualLibraries),
            "Pooled Libraries" => Some(Self::PooledLibraries),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}

/// Read direction encoded in a FASTQ filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadDirection {
    R1,
    R2,
}

impl ReadDirection {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "R1" => Some(Self::R1),
            "R2" => Some(Self::R2),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReadDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::R1 => write!(f, "R1"),
            Self::R2 => write!(f, "R2"),
        }
    }
}

/// The two sample index reads of a dual-indexed library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    I7,
    I5,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::I7 => write!(f, "i7"),
            Self::I5 => write!(f, "i5"),
        }
    }
}

/// A 1-based (column, row) position within a worksheet, as spreadsheet users count them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub column: u32,
    pub row: u32,
}

impl CellCoord {
    #[must_use]
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// The cell `rows` rows below this one, in the same column
    #[must_use]
    pub fn below(self, rows: u32) -> Self {
        Self {
            column: self.column,
            row: self.row + rows,
        }
    }

    /// Spreadsheet-style column letters ("A", "Z", "AA", ...)
    #[must_use]
    pub fn column_letters(&self) -> String {
        let mut letters = Vec::new();
        let mut n = self.column;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}
