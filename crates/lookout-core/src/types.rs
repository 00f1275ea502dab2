//! Shared types used across the Lookout toolkit.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::LookoutError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A validated username to investigate.
///
/// Usernames are substituted verbatim into probe URL templates, so they are
/// restricted to URL-safe characters and can never contain the `{}`
/// placeholder syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new `Username` from a string.
    ///
    /// # Errors
    /// Returns error if the username is empty, longer than 64 characters, or
    /// contains anything other than ASCII letters, digits, `.`, `_` or `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, LookoutError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), LookoutError> {
        static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = USERNAME_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]{1,64}$").expect("valid regex"));

        if regex.is_match(name) {
            Ok(())
        } else {
            Err(LookoutError::Validation(format!(
                "invalid username: must be 1-64 characters of [A-Za-z0-9._-], got '{name}'"
            )))
        }
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Newtype for case identifiers.
///
/// Case IDs must be valid UUIDs (v4 format). They double as directory names,
/// so validation also rules out path traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    /// Create a new `CaseId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a valid UUID v4.
    pub fn new(id: impl Into<String>) -> Result<Self, LookoutError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a new random `CaseId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), LookoutError> {
        static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = UUID_REGEX.get_or_init(|| {
            Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
                .expect("valid regex")
        });

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(LookoutError::Validation(format!(
                "invalid case ID: must be a valid UUID v4, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform category labels.
///
/// Serialized with the capitalized label used in probe definition files
/// (`"Social"`, `"Tech"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Social networks
    Social,
    /// Technology communities and services
    Tech,
    /// Developer platforms and code hosting
    Developer,
    /// Gaming networks
    Gaming,
    /// Search engines (manual dork links)
    Search,
    /// Contact channels (email-derived pivots)
    Contact,
    /// Archived copies of deleted profiles
    Archive,
    /// Media and content hosting
    Media,
    /// Professional networks
    Professional,
    /// Forums and discussion boards
    Forum,
    /// Anything else
    Other,
}

impl Category {
    /// All known categories.
    pub const ALL: [Category; 11] = [
        Self::Social,
        Self::Tech,
        Self::Developer,
        Self::Gaming,
        Self::Search,
        Self::Contact,
        Self::Archive,
        Self::Media,
        Self::Professional,
        Self::Forum,
        Self::Other,
    ];

    /// The label used in definition files and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Tech => "Tech",
            Self::Developer => "Developer",
            Self::Gaming => "Gaming",
            Self::Search => "Search",
            Self::Contact => "Contact",
            Self::Archive => "Archive",
            Self::Media => "Media",
            Self::Professional => "Professional",
            Self::Forum => "Forum",
            Self::Other => "Other",
        }
    }

    /// Whether a hit in this category counts toward the developer footprint.
    #[must_use]
    pub fn is_dev_signal(&self) -> bool {
        matches!(self, Self::Tech | Self::Developer | Self::Gaming)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LookoutError;

    /// Parse a category label, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LookoutError::Validation(format!("unknown category '{s}'")))
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, LookoutError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| LookoutError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
