//! Case file types.

use lookout_core::{CaseId, Timestamp};
use serde::{Deserialize, Serialize};

/// The files making up a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseFile {
    /// `metadata.json`
    Metadata,
    /// `investigation.json`
    Investigation,
    /// `analyst_notes.json`
    AnalystNotes,
    /// `evidence.json`
    Evidence,
}

impl CaseFile {
    /// Files initialized empty when a case is created.
    pub const DATA_FILES: [CaseFile; 3] = [Self::Investigation, Self::AnalystNotes, Self::Evidence];

    /// File name inside the case directory.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Metadata => "metadata.json",
            Self::Investigation => "investigation.json",
            Self::AnalystNotes => "analyst_notes.json",
            Self::Evidence => "evidence.json",
        }
    }
}

/// Processing state reported for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStatus {
    /// No investigation stored yet
    Processing,
    /// An investigation has been stored
    Completed,
}

/// Which identifiers a case covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseScope {
    /// Username reconnaissance
    pub username: bool,
    /// Email lookups
    pub email: bool,
    /// Phone number analysis
    pub phone: bool,
}

impl Default for CaseScope {
    fn default() -> Self {
        Self {
            username: true,
            email: true,
            phone: true,
        }
    }
}

/// Contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// Case identifier
    pub case_id: CaseId,
    /// Display name
    pub case_name: String,
    /// Responsible analyst
    pub analyst: String,
    /// Covered identifiers
    pub scope: CaseScope,
    /// Lifecycle label, `OPEN` on creation
    pub status: String,
    /// Creation time
    pub created_at: Timestamp,
    /// Last metadata change
    pub updated_at: Timestamp,
}

/// Evidence as submitted by an analyst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceInput {
    /// Platform the evidence was collected from
    pub platform: Option<String>,
    /// Source URL
    pub url: Option<String>,
    /// Evidence kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Collecting analyst
    pub analyst: String,
    /// Free-form notes
    pub notes: String,
    /// Analyst confidence label
    pub confidence: String,
    /// Screenshot paths or URLs
    pub images: Vec<String>,
}

impl Default for EvidenceInput {
    fn default() -> Self {
        Self {
            platform: None,
            url: None,
            kind: "profile".to_string(),
            analyst: "Unknown".to_string(),
            notes: String::new(),
            confidence: "MEDIUM".to_string(),
            images: Vec::new(),
        }
    }
}

/// One entry of the evidence log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// Random identifier
    pub evidence_id: String,
    /// Submitted evidence
    #[serde(flatten)]
    pub input: EvidenceInput,
    /// When it was logged
    pub collected_at: Timestamp,
}
