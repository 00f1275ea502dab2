//! Per-platform findings produced by a sweep.

use lookout_core::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a result entered the result map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Direct platform probe
    Probe,
    /// Wayback snapshot substituted for a missed social profile
    Archive,
    /// Email-guess pivot
    Pivot,
    /// Synthetic manual-search link
    Dork,
}

/// Kind of secret found in a bio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecretKind {
    /// Email address
    Email,
    /// Bitcoin address
    Btc,
}

/// A tagged secret string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret {
    /// What was detected
    pub kind: SecretKind,
    /// The matched text
    pub value: String,
}

impl Secret {
    /// An email secret.
    #[must_use]
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            kind: SecretKind::Email,
            value: value.into(),
        }
    }

    /// A Bitcoin address secret.
    #[must_use]
    pub fn btc(value: impl Into<String>) -> Self {
        Self {
            kind: SecretKind::Btc,
            value: value.into(),
        }
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SecretKind::Email => write!(f, "Email: {}", self.value),
            SecretKind::Btc => write!(f, "BTC: {}", self.value),
        }
    }
}

/// Demographic guess derived from a profile's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Demographic {
    /// Name is predominantly female
    Female,
    /// Name is predominantly male
    Male,
    /// Classifier ran but could not decide
    Uncertain,
    /// No classifier, no name, or the name is unknown to it
    #[default]
    Unknown,
}

impl Demographic {
    /// Whether the guess carries a usable signal.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Structured signals parsed out of a profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBlock {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Preview image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Bio excerpt, at most 300 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Emails and crypto addresses found in the bio
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<Secret>,
    /// Account creation date (`YYYY-MM-DD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Demographic guess from the title's first token
    #[serde(default)]
    pub demographic: Demographic,
    /// Social-graph connections from a deep scan
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<String>,
}

impl MetadataBlock {
    /// A block carrying only a bio line.
    #[must_use]
    pub fn with_bio(bio: impl Into<String>) -> Self {
        Self {
            bio: Some(bio.into()),
            ..Self::default()
        }
    }
}

/// Breach flag attached to a result by the breach collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachAttachment {
    /// Whether the account was found compromised
    pub compromised: bool,
    /// Where the compromise was observed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

/// Outcome of one probe, or of a pivot standing in for one.
///
/// Created once and not modified afterwards, except for the breach
/// attachment which is added downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Platform name as shown to the user
    pub platform: String,
    /// Resolved profile URL (or snapshot URL)
    pub url: String,
    /// Category (rewritten to `Archive` for snapshots)
    pub category: Category,
    /// Whether the profile exists
    pub found: bool,
    /// Extracted metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataBlock>,
    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// How the result was produced
    pub origin: ResultOrigin,
    /// Breach flag, if a breach check ran for this platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breach_data: Option<BreachAttachment>,
}

impl ProbeResult {
    /// A found result from a direct probe.
    #[must_use]
    pub fn found(platform: impl Into<String>, url: impl Into<String>, category: Category) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
            category,
            found: true,
            metadata: None,
            avatar: None,
            origin: ResultOrigin::Probe,
            breach_data: None,
        }
    }

    /// Attach a metadata block.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MetadataBlock) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Secrets from the metadata block, if any.
    #[must_use]
    pub fn secrets(&self) -> &[Secret] {
        self.metadata.as_ref().map_or(&[], |m| m.secrets.as_slice())
    }

    /// Demographic guess, `Unknown` when there is no metadata.
    #[must_use]
    pub fn demographic(&self) -> Demographic {
        self.metadata
            .as_ref()
            .map_or(Demographic::Unknown, |m| m.demographic)
    }

    /// Whether this entry is synthetic and carries no evidence.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.origin == ResultOrigin::Dork
    }
}
