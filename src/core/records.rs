use serde::{Deserialize, Serialize};

use crate::core::index::{IndexPair, IndexSequence};
use crate::core::types::ReadDirection;

/// One physical tube (or pool tube) listed on a submission sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TubeRecord {
    pub project_id: String,

    pub tube_id: String,

    /// The name of the pooled library; may be a sample ID or tube ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantitation_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
}

impl TubeRecord {
    pub fn new(project_id: impl Into<String>, tube_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            tube_id: tube_id.into(),
            pool_id: None,
            volume: None,
            concentration: None,
            total_amount: None,
            quantitation_method: None,
            buffer: None,
            organism: None,
        }
    }
}

impl std::fmt::Display for TubeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tube ID: {}", self.tube_id)
    }
}

/// One expected sample and the indexes the customer says it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub project_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,

    /// Customer-provided component identifier; may be an index name or other label
    pub sample_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i7_index_name: Option<String>,

    pub i7_index_sequence: IndexSequence,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i5_index_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i5_index_sequence: Option<IndexSequence>,
}

impl ComponentRecord {
    #[must_use]
    pub fn index_pair(&self) -> IndexPair {
        IndexPair::new(
            self.i7_index_sequence.clone(),
            self.i5_index_sequence.clone(),
        )
    }
}

impl std::fmt::Display for ComponentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sample ID: {}", self.sample_id)
    }
}

/// One FASTQ file actually produced by the sequencer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreRecord {
    pub project_id: String,

    pub pool_id: String,

    /// Component identifier from the filename; should map to a customer-provided name
    pub sample_id: String,

    /// Flowcell the sample was run on
    pub flowcell_id: String,

    /// Lane token from the filename, e.g. `L004`
    pub lane: String,

    pub read: ReadDirection,

    pub i7_index_sequence: IndexSequence,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i5_index_sequence: Option<IndexSequence>,

    pub filename: String,
}

impl CoreRecord {
    #[must_use]
    pub fn index_pair(&self) -> IndexPair {
        IndexPair::new(
            self.i7_index_sequence.clone(),
            self.i5_index_sequence.clone(),
        )
    }
}

impl std::fmt::Display for CoreRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filename: {}", self.filename)
    }
}
