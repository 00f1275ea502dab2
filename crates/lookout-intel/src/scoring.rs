//! Correlation, risk and identity-confidence scoring.
//!
//! Risk is unbounded; identity confidence is capped at 100. Neither shares a
//! scale with the 150-point radar axes.

use crate::email::EmailReport;
use crate::error::{IntelError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use lookout_scanner::ProbeResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static DOB_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid DOB regex"));

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%b %d, %Y", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"];

const MAX_CONFIDENCE: u32 = 100;

/// Three-step severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

/// Cross-source links for one investigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    /// Platforms with a found profile, sorted
    pub linked_platforms: Vec<String>,
    /// Whether a valid phone number was supplied
    pub phone_valid: bool,
    /// Whether the date of birth appeared in public text
    pub dob_exposed: bool,
}

/// Build the correlation record from a result map.
#[must_use]
pub fn correlate(
    results: &HashMap<String, ProbeResult>,
    phone_valid: bool,
    dob_exposed: bool,
) -> Correlation {
    let mut linked_platforms: Vec<String> = results
        .iter()
        .filter(|(_, r)| r.found)
        .map(|(name, _)| name.clone())
        .collect();
    linked_platforms.sort();

    Correlation {
        linked_platforms,
        phone_valid,
        dob_exposed,
    }
}

/// Exposure risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Raw score
    pub risk_score: u32,
    /// LOW below 30, MEDIUM below 70, else HIGH
    pub level: Level,
}

/// 15 per linked platform, 10 for a valid phone, 30 for an exposed DOB.
#[must_use]
pub fn calculate_risk(correlation: &Correlation) -> RiskAssessment {
    let linked = u32::try_from(correlation.linked_platforms.len()).unwrap_or(u32::MAX);
    let mut score = linked.saturating_mul(15);
    if correlation.phone_valid {
        score = score.saturating_add(10);
    }
    if correlation.dob_exposed {
        score = score.saturating_add(30);
    }

    let level = match score {
        0..=29 => Level::Low,
        30..=69 => Level::Medium,
        _ => Level::High,
    };

    RiskAssessment {
        risk_score: score,
        level,
    }
}

/// Signals feeding [`identity_confidence`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceInputs<'a> {
    /// Found entries in the username sweep
    pub found_platforms: usize,
    /// Email lookup, if an address was given
    pub email: Option<&'a EmailReport>,
    /// Whether a profile publicly exposed an email
    pub profile_email_exposed: bool,
    /// Whether a valid phone number was supplied
    pub phone_valid: bool,
}

/// How confidently the signals point at one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfidence {
    /// Score out of 100
    pub confidence_score: u32,
    /// HIGH from 70, MEDIUM from 40, else LOW
    pub level: Level,
    /// Human-readable contributing factors
    pub reasons: Vec<String>,
}

/// Score identity confidence, capped at 100.
#[must_use]
pub fn identity_confidence(inputs: &ConfidenceInputs<'_>) -> IdentityConfidence {
    let email = inputs.email;
    let signals: [(bool, u32, &str); 6] = [
        (
            inputs.found_platforms >= 2,
            30,
            "Username reused across multiple platforms",
        ),
        (email.is_some_and(|e| e.valid), 10, "Valid email provided"),
        (
            email.is_some_and(|e| !e.variations.is_empty()),
            15,
            "Email variations correlate with username",
        ),
        (
            inputs.profile_email_exposed,
            20,
            "Email publicly exposed on GitHub",
        ),
        (inputs.phone_valid, 10, "Valid phone number"),
        (
            email.is_some_and(|e| e.gravatar.exists),
            10,
            "Public Gravatar profile detected",
        ),
    ];

    let mut score = 0;
    let mut reasons = Vec::new();
    for (fired, points, reason) in signals {
        if fired {
            score += points;
            reasons.push(reason.to_string());
        }
    }
    let score = score.min(MAX_CONFIDENCE);

    let level = if score >= 70 {
        Level::High
    } else if score >= 40 {
        Level::Medium
    } else {
        Level::Low
    };

    IdentityConfidence {
        confidence_score: score,
        level,
        reasons,
    }
}

/// Whether `dob` (`YYYY-MM-DD`) appears in any of `texts`, written with
/// either `-` or `/` separators.
pub fn check_dob_exposure<I, S>(texts: I, dob: &str) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let caps = DOB_SHAPE
        .captures(dob.trim())
        .ok_or_else(|| IntelError::InvalidDate(dob.to_string()))?;

    let pattern = format!("{}[/-]{}[/-]{}", &caps[1], &caps[2], &caps[3]);
    let regex = Regex::new(&pattern).map_err(|_| IntelError::InvalidDate(dob.to_string()))?;

    Ok(texts.into_iter().any(|text| regex.is_match(text.as_ref())))
}

/// Day of week for a date string, Monday = 0.
///
/// Fractional seconds are ignored. Returns `None` for unrecognized input.
#[must_use]
pub fn weekday_index(date: &str) -> Option<u32> {
    let trimmed = date.trim();
    let date = trimmed.split('.').next().unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
                .map(|dt| dt.date())
        })
        .map(|d| d.weekday().num_days_from_monday())
}
