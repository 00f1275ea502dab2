//! Offline phone number analysis.
//!
//! Numbers are expected in international form (`+<country code>...`). Only
//! the bundled numbering-plan metadata is consulted; nothing goes over the
//! network.

use crate::error::{IntelError, Result};
use phonenumber::metadata::DATABASE;
use phonenumber::{Mode, PhoneNumber, Type};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shortest input worth parsing.
const MIN_INPUT_CHARS: usize = 5;

const UNKNOWN_REGION: &str = "Unknown Region";

/// Kind of line a number is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Mobile / cellular
    Mobile,
    /// Fixed landline
    Landline,
    /// Voice over IP
    Voip,
    /// Toll-free
    TollFree,
    /// Anything else, including numbers valid as either fixed or mobile
    Unknown,
}

impl LineType {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile / Cellular",
            Self::Landline => "Landline",
            Self::Voip => "VoIP (Virtual)",
            Self::TollFree => "Toll-Free",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<Type> for LineType {
    fn from(kind: Type) -> Self {
        match kind {
            Type::Mobile => Self::Mobile,
            Type::FixedLine => Self::Landline,
            Type::Voip => Self::Voip,
            Type::TollFree => Self::TollFree,
            _ => Self::Unknown,
        }
    }
}

/// Technical description of a valid number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDetails {
    /// ISO 3166 region code, or "Unknown Region"
    pub country: String,
    /// Country calling code
    pub calling_code: u16,
    /// Line type
    pub line_type: LineType,
    /// E.164 form, e.g. `+447400123456`
    pub format_e164: String,
    /// National form, e.g. `07400 123456`
    pub format_national: String,
}

/// A labelled search link for the number's web footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDork {
    /// Where the link goes
    pub label: String,
    /// Link target
    pub url: String,
}

/// Result of [`phone_lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneReport {
    /// Input as given
    pub number: String,
    /// Whether the number matches its region's numbering plan
    pub valid: bool,
    /// Why the number was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PhoneDetails>,
    /// Search links, empty when invalid
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dorks: Vec<PhoneDork>,
}

impl PhoneReport {
    fn invalid(number: &str, reason: String) -> Self {
        Self {
            number: number.to_string(),
            valid: false,
            error: Some(reason),
            details: None,
            dorks: Vec::new(),
        }
    }
}

/// Parse `number` and require it to be a valid, dialable number.
pub fn parse_phone(number: &str) -> Result<PhoneNumber> {
    let invalid = |reason: &str| IntelError::InvalidPhone {
        number: number.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = number.trim();
    if trimmed.chars().count() < MIN_INPUT_CHARS {
        return Err(invalid("Number too short or empty"));
    }

    let parsed = phonenumber::parse(None, trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !phonenumber::is_valid(&parsed) {
        return Err(invalid("Invalid Number Pattern"));
    }
    Ok(parsed)
}

/// Describe `number`. Never fails: rejected input yields `valid = false`
/// with the reason in `error`.
#[must_use]
pub fn phone_lookup(number: &str) -> PhoneReport {
    let parsed = match parse_phone(number) {
        Ok(parsed) => parsed,
        Err(IntelError::InvalidPhone { reason, .. }) => {
            debug!(reason = %reason, "phone number rejected");
            return PhoneReport::invalid(number, reason);
        }
        Err(e) => return PhoneReport::invalid(number, e.to_string()),
    };

    let country = parsed
        .country()
        .id()
        .map_or_else(|| UNKNOWN_REGION.to_string(), |id| format!("{id:?}"));

    let details = PhoneDetails {
        country,
        calling_code: parsed.code().value(),
        line_type: parsed.number_type(&DATABASE).into(),
        format_e164: parsed.format().mode(Mode::E164).to_string(),
        format_national: parsed.format().mode(Mode::National).to_string(),
    };
    let dorks = dorks(&details);

    PhoneReport {
        number: number.to_string(),
        valid: true,
        error: None,
        details: Some(details),
        dorks,
    }
}

fn dorks(details: &PhoneDetails) -> Vec<PhoneDork> {
    let e164 = &details.format_e164;
    let national = &details.format_national;
    let digits = e164.trim_start_matches('+');

    let google = format!("\"{e164}\" OR \"{national}\"");
    let truecaller = format!("site:truecaller.com \"{national}\"");

    [
        (
            "Google Search",
            format!("https://www.google.com/search?q={}", urlencoding::encode(&google)),
        ),
        (
            "TrueCaller Search",
            format!("https://www.google.com/search?q={}", urlencoding::encode(&truecaller)),
        ),
        ("WhatsApp", format!("https://wa.me/{digits}")),
        ("Telegram", format!("https://t.me/+{digits}")),
    ]
    .into_iter()
    .map(|(label, url)| PhoneDork {
        label: label.to_string(),
        url,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mobile_number() {
        let report = phone_lookup("+447400123456");

        assert!(report.valid);
        assert!(report.error.is_none());
        let details = report.details.expect("details for a valid number");
        assert_eq!(details.country, "GB");
        assert_eq!(details.calling_code, 44);
        assert_eq!(details.line_type, LineType::Mobile);
        assert_eq!(details.format_e164, "+447400123456");
        assert!(details.format_national.starts_with("07400"));

        let labels: Vec<_> = report.dorks.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Google Search", "TrueCaller Search", "WhatsApp", "Telegram"]);
        assert_eq!(report.dorks[2].url, "https://wa.me/447400123456");
        assert!(report.dorks[0].url.contains("%2B447400123456"));
    }

    #[test]
    fn test_rejected_inputs() {
        let short = phone_lookup("+44");
        assert!(!short.valid);
        assert_eq!(short.error.as_deref(), Some("Number too short or empty"));
        assert!(short.dorks.is_empty());

        assert!(!phone_lookup("").valid);
        assert!(!phone_lookup("call me maybe").valid);
        assert!(!phone_lookup("+44 12").valid);
    }

    #[test]
    fn test_parse_phone_reports_input() {
        match parse_phone("1234") {
            Err(IntelError::InvalidPhone { number, .. }) => assert_eq!(number, "1234"),
            other => panic!("expected InvalidPhone, got {other:?}"),
        }
    }

    #[test]
    fn test_line_type_labels() {
        assert_eq!(LineType::from(Type::Voip).label(), "VoIP (Virtual)");
        assert_eq!(LineType::from(Type::FixedLineOrMobile), LineType::Unknown);
    }
}
