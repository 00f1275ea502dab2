//! Probe definition types.
//!
//! Definition files are parsed into [`RawProbeDefinition`] first, then each
//! entry is validated into a [`ProbeDefinition`] on its own so that one bad
//! entry never takes the rest of the file down with it.

use crate::error::{ProbeDefinitionError, Result};
use lookout_core::{Category, Username};
use serde::{Deserialize, Serialize};

/// Placeholder in URL templates that receives the username.
pub const URL_PLACEHOLDER: &str = "{}";

/// Platform that gets deep-scanned when a file doesn't say otherwise.
const DEFAULT_DEEP_SCAN_PLATFORM: &str = "GitHub";

/// How a fetched page is turned into a found/not-found decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check_type", rename_all = "snake_case")]
pub enum CheckStrategy {
    /// Found iff the response is HTTP 200.
    StatusCode,
    /// Found iff the response is HTTP 200 and `error_msg` does not occur in
    /// the body. For sites whose "no such user" page also returns 200.
    StringMatch {
        /// Phrase that only appears on the site's not-found page
        error_msg: String,
    },
}

impl CheckStrategy {
    /// Decide existence from a status code and body.
    #[must_use]
    pub fn is_found(&self, status: u16, body: &str) -> bool {
        if status != 200 {
            return false;
        }
        match self {
            Self::StatusCode => true,
            Self::StringMatch { error_msg } => !body.contains(error_msg.as_str()),
        }
    }
}

/// A validated platform probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeDefinition {
    name: String,
    url_template: String,
    category: Category,
    check: CheckStrategy,
    deep_scan: bool,
}

impl ProbeDefinition {
    /// Build and validate a definition.
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        category: Category,
        check: CheckStrategy,
        deep_scan: bool,
    ) -> Result<Self> {
        let definition = Self {
            name: name.into(),
            url_template: url_template.into(),
            category,
            check,
            deep_scan,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Platform name (unique within a registry).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL template containing one `{}` placeholder.
    #[must_use]
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Platform category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Existence check strategy.
    #[must_use]
    pub fn check(&self) -> &CheckStrategy {
        &self.check
    }

    /// Whether a hit on this platform triggers the connections deep scan and
    /// account-creation date extraction.
    #[must_use]
    pub fn deep_scan(&self) -> bool {
        self.deep_scan
    }

    /// Substitute the username into the URL template.
    ///
    /// No escaping is applied; `Username` only admits URL-safe characters.
    #[must_use]
    pub fn resolve_url(&self, username: &Username) -> String {
        self.url_template.replace(URL_PLACEHOLDER, username.as_str())
    }

    /// Validate the definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("<unnamed>", "platform name cannot be empty"));
        }

        if self.url_template.trim().is_empty() {
            return Err(invalid(&self.name, "URL template cannot be empty"));
        }

        if !(self.url_template.starts_with("http://") || self.url_template.starts_with("https://"))
        {
            return Err(invalid(&self.name, "URL template must be an http(s) URL"));
        }

        let placeholders = self.url_template.matches(URL_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(invalid(
                &self.name,
                &format!("URL template must contain exactly one {URL_PLACEHOLDER}, found {placeholders}"),
            ));
        }

        if let CheckStrategy::StringMatch { error_msg } = &self.check {
            if error_msg.is_empty() {
                return Err(invalid(
                    &self.name,
                    "string_match check requires a non-empty error_msg",
                ));
            }
        }

        Ok(())
    }
}

/// A probe entry exactly as it appears in a definition file.
///
/// Mirrors the flat layout of the bundled `platforms.toml`:
///
/// ```toml
/// [[platform]]
/// name = "Reddit"
/// url = "https://www.reddit.com/user/{}"
/// category = "Social"
/// check_type = "string_match"
/// error_msg = "Sorry, nobody on Reddit goes by that name."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProbeDefinition {
    /// Platform name
    pub name: String,
    /// URL template
    pub url: String,
    /// Category label
    pub category: String,
    /// `status_code` (default) or `string_match`
    #[serde(default)]
    pub check_type: Option<String>,
    /// Not-found phrase for `string_match`
    #[serde(default)]
    pub error_msg: Option<String>,
    /// Deep-scan flag; defaults to true only for GitHub
    #[serde(default)]
    pub deep_scan: Option<bool>,
}

impl TryFrom<RawProbeDefinition> for ProbeDefinition {
    type Error = ProbeDefinitionError;

    fn try_from(raw: RawProbeDefinition) -> Result<Self> {
        let category: Category = raw
            .category
            .parse()
            .map_err(|_| invalid(&raw.name, &format!("unknown category '{}'", raw.category)))?;

        let check = match raw.check_type.as_deref().unwrap_or("status_code") {
            "status_code" => CheckStrategy::StatusCode,
            "string_match" => CheckStrategy::StringMatch {
                error_msg: raw.error_msg.clone().unwrap_or_default(),
            },
            other => {
                return Err(invalid(
                    &raw.name,
                    &format!("unknown check_type '{other}'"),
                ))
            }
        };

        let deep_scan = raw
            .deep_scan
            .unwrap_or_else(|| raw.name == DEFAULT_DEEP_SCAN_PLATFORM);

        Self::new(raw.name, raw.url, category, check, deep_scan)
    }
}

fn invalid(name: &str, reason: &str) -> ProbeDefinitionError {
    ProbeDefinitionError::ValidationError {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
