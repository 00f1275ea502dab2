//! Email address lookup.

use lookout_scanner::{GravatarPivot, HttpTransport};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("valid email regex"));

/// Breach hint for a valid address.
pub const BREACH_INDICATOR: &str = "Check via trusted breach intelligence (HIBP)";

/// Breach hint when nothing was checked.
const BREACH_UNKNOWN: &str = "UNKNOWN";

/// Gravatar presence for an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravatarProfile {
    /// Whether an avatar is registered
    pub exists: bool,
    /// Public profile URL when it exists
    pub profile_url: Option<String>,
}

/// Result of an email lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReport {
    /// Address as given
    pub email: String,
    /// Whether the address has a valid shape
    pub valid: bool,
    /// Mail provider (the domain)
    pub provider: Option<String>,
    /// Likely alternate spellings of the address
    pub variations: Vec<String>,
    /// Gravatar presence
    pub gravatar: GravatarProfile,
    /// Where to look for breach data
    pub breach_indicator: String,
}

impl EmailReport {
    fn invalid(email: &str) -> Self {
        Self {
            email: email.to_string(),
            valid: false,
            provider: None,
            variations: Vec::new(),
            gravatar: GravatarProfile::default(),
            breach_indicator: BREACH_UNKNOWN.to_string(),
        }
    }

    /// Local part of the address.
    #[must_use]
    pub fn local_part(&self) -> Option<&str> {
        self.email.split_once('@').map(|(local, _)| local)
    }
}

/// Whether `email` has the accepted `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// The address plus variants with `.`, `_` or `-` dropped from the local
/// part, and with its last character dropped when the local part is longer
/// than four characters. Deduplicated.
#[must_use]
pub fn email_variations(email: &str) -> Vec<String> {
    let Some((local, domain)) = email.split_once('@') else {
        return vec![email.to_string()];
    };

    let mut variations = BTreeSet::new();
    variations.insert(email.to_string());
    for strip in ['.', '_', '-'] {
        variations.insert(format!("{}@{domain}", local.replace(strip, "")));
    }

    let chars: Vec<char> = local.chars().collect();
    if chars.len() > 4 {
        let shortened: String = chars[..chars.len() - 1].iter().collect();
        variations.insert(format!("{shortened}@{domain}"));
    }

    variations.into_iter().collect()
}

/// Email lookup against public sources.
#[derive(Clone)]
pub struct EmailLookup {
    gravatar: GravatarPivot,
}

impl EmailLookup {
    /// Create a lookup that gives each request `timeout`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self {
            gravatar: GravatarPivot::new(transport, timeout),
        }
    }

    /// Inspect `email`. Invalid addresses make no network calls.
    pub async fn lookup(&self, email: &str) -> EmailReport {
        let email = email.trim();
        if !is_valid_email(email) {
            debug!(email = %email, "email rejected by shape check");
            return EmailReport::invalid(email);
        }

        let provider = email.split_once('@').map(|(_, domain)| domain.to_string());

        let gravatar = match self.gravatar.has_avatar(email).await {
            Ok(true) => GravatarProfile {
                exists: true,
                profile_url: Some(GravatarPivot::profile_url(email)),
            },
            Ok(false) => GravatarProfile::default(),
            Err(e) => {
                debug!(email = %email, error = %e, "gravatar check failed");
                GravatarProfile::default()
            }
        };

        EmailReport {
            email: email.to_string(),
            valid: true,
            provider,
            variations: email_variations(email),
            gravatar,
            breach_indicator: BREACH_INDICATOR.to_string(),
        }
    }
}
