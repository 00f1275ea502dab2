//! Breach exposure via a commit-email pivot.
//!
//! 1. Find an email address in the user's public GitHub push events.
//! 2. Look that address up in Hudson Rock's infostealer preview API.

use crate::error::Result;
use lookout_scanner::{BreachAttachment, HttpTransport, ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const NOREPLY_DOMAIN: &str = "users.noreply.github.com";

const UNKNOWN_STEALER: &str = "Unknown Infostealer";

/// Sources reported for a compromised address.
const MAX_SOURCES: usize = 3;

/// Outcome class of a breach check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreachStatus {
    /// Address found in stealer logs
    Danger,
    /// Address checked, nothing found
    Clean,
    /// No address to check
    Skipped,
}

/// Result of [`BreachChecker::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachReport {
    /// Outcome
    pub status: BreachStatus,
    /// Address that was checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Stealer families or machine names, at most three
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breaches: Vec<String>,
    /// Timeline line for a compromised address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_event: Option<String>,
    /// Why the check was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BreachReport {
    fn skipped(reason: &str) -> Self {
        Self {
            status: BreachStatus::Skipped,
            email: None,
            breaches: Vec::new(),
            timeline_event: None,
            reason: Some(reason.to_string()),
        }
    }

    /// Whether the address was found compromised.
    #[must_use]
    pub fn is_compromised(&self) -> bool {
        self.status == BreachStatus::Danger
    }
}

#[derive(Debug, Deserialize)]
struct GitHubEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: PushPayload,
}

#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    #[serde(default)]
    commits: Vec<Commit>,
}

#[derive(Debug, Deserialize)]
struct Commit {
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    email: String,
}

#[derive(Debug, Deserialize)]
struct StealerResponse {
    #[serde(default)]
    stealers: Vec<Stealer>,
}

#[derive(Debug, Deserialize)]
struct Stealer {
    computer_name: Option<String>,
}

/// Breach checker over an HTTP transport.
#[derive(Clone)]
pub struct BreachChecker {
    transport: Arc<dyn HttpTransport>,
    lookup_timeout: Duration,
    breach_timeout: Duration,
}

impl BreachChecker {
    /// Create a checker. `lookup_timeout` bounds the GitHub request and
    /// `breach_timeout` the stealer-log request.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        lookup_timeout: Duration,
        breach_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            lookup_timeout,
            breach_timeout,
        }
    }

    /// First non-noreply commit author email in `username`'s public push events.
    pub async fn commit_email(&self, username: &str) -> Result<Option<String>> {
        let url = format!(
            "https://api.github.com/users/{}/events/public",
            urlencoding::encode(username)
        );
        let response = self.transport.get(&url, self.lookup_timeout).await?;
        if !response.is_ok() {
            return Ok(None);
        }

        let events: Vec<GitHubEvent> = response.json(&url)?;
        Ok(events
            .into_iter()
            .filter(|event| event.kind == "PushEvent")
            .flat_map(|event| event.payload.commits)
            .map(|commit| commit.author.email)
            .find(|email| !email.contains(NOREPLY_DOMAIN)))
    }

    /// Stealer sources for `email`, `None` when the address is not listed.
    pub async fn stealer_sources(&self, email: &str) -> Result<Option<Vec<String>>> {
        let url = format!(
            "https://cavalier.hudsonrock.com/api/json/v2/preview/search-by-login/osint-tools?login={}",
            urlencoding::encode(email)
        );
        let response = self.transport.get(&url, self.breach_timeout).await?;
        if !response.is_ok() {
            return Err(ProbeError::Status {
                url,
                status: response.status,
            }
            .into());
        }

        let parsed: StealerResponse = response.json(&url)?;
        if parsed.stealers.is_empty() {
            return Ok(None);
        }

        Ok(Some(
            parsed
                .stealers
                .into_iter()
                .take(MAX_SOURCES)
                .map(|s| s.computer_name.unwrap_or_else(|| UNKNOWN_STEALER.to_string()))
                .collect(),
        ))
    }

    /// Run both steps for `username`. Lookup faults degrade to `Skipped`
    /// (no email) or `Clean` (email found, stealer lookup failed).
    pub async fn check(&self, username: &str) -> BreachReport {
        let email = match self.commit_email(username).await {
            Ok(Some(email)) => email,
            Ok(None) => return BreachReport::skipped("No email found in public sources"),
            Err(e) => {
                debug!(username = %username, error = %e, "commit email lookup failed");
                return BreachReport::skipped("No email found in public sources");
            }
        };

        info!(username = %username, "found commit email for breach check");

        let sources = match self.stealer_sources(&email).await {
            Ok(sources) => sources,
            Err(e) => {
                debug!(error = %e, "stealer log lookup failed");
                None
            }
        };

        match sources {
            Some(breaches) => BreachReport {
                status: BreachStatus::Danger,
                timeline_event: Some(format!(
                    "Compromised in {} Malware Campaigns",
                    breaches.len()
                )),
                email: Some(email),
                breaches,
                reason: None,
            },
            None => BreachReport {
                status: BreachStatus::Clean,
                email: Some(email),
                breaches: Vec::new(),
                timeline_event: None,
                reason: None,
            },
        }
    }
}

/// Attach a compromised `report` to `platform`'s result.
///
/// Returns `true` when an attachment was made; clean reports and unknown
/// platforms leave the map untouched.
pub fn attach_breach(
    results: &mut HashMap<String, ProbeResult>,
    platform: &str,
    report: &BreachReport,
) -> bool {
    if !report.is_compromised() {
        return false;
    }
    match results.get_mut(platform) {
        Some(result) => {
            result.breach_data = Some(BreachAttachment {
                compromised: true,
                sources: report.breaches.clone(),
            });
            true
        }
        None => false,
    }
}
