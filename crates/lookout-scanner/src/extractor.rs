//! Profile page metadata extraction.
//!
//! Pulls the title, preview image and bio out of a fetched document, then
//! scans the bio for contact secrets. A page that doesn't parse simply
//! yields empty fields.

use crate::demographics::{self, DemographicClassifier};
use crate::result::{MetadataBlock, Secret};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::Arc;

/// Bio excerpts are cut to this many characters.
pub const MAX_BIO_CHARS: usize = 300;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static BTC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:bc1|[13])[a-zA-HJ-NP-Z0-9]{25,39}\b").expect("valid BTC regex")
});

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid selector"));
static DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).expect("valid selector"));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).expect("valid selector"));
static RELATIVE_TIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("relative-time[datetime]").expect("valid selector"));

/// Parses profile pages into [`MetadataBlock`]s.
#[derive(Clone, Default)]
pub struct MetadataExtractor {
    classifier: Option<Arc<dyn DemographicClassifier>>,
}

impl MetadataExtractor {
    /// Create an extractor without demographic inference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable demographic inference through `classifier`.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn DemographicClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Extract metadata from `body`.
    ///
    /// `deep_scan` enables account-creation date extraction.
    #[must_use]
    pub fn extract(&self, body: &str, deep_scan: bool) -> MetadataBlock {
        let document = Html::parse_document(body);

        let title = document
            .select(&TITLE)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let image = meta_content(&document, &OG_IMAGE);

        let bio = meta_content(&document, &DESCRIPTION)
            .or_else(|| meta_content(&document, &OG_DESCRIPTION))
            .map(|text| text.chars().take(MAX_BIO_CHARS).collect::<String>());

        let secrets = bio.as_deref().map(find_secrets).unwrap_or_default();

        let created_at = if deep_scan {
            document
                .select(&RELATIVE_TIME)
                .next()
                .and_then(|el| el.value().attr("datetime"))
                .map(|dt| dt.chars().take(10).collect())
        } else {
            None
        };

        let demographic = title.as_deref().map_or_else(Default::default, |t| {
            demographics::infer(self.classifier.as_deref(), t)
        });

        MetadataBlock {
            title,
            image,
            bio,
            secrets,
            created_at,
            demographic,
            connections: Vec::new(),
        }
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Every email in `text`, then the first Bitcoin address.
#[must_use]
pub fn find_secrets(text: &str) -> Vec<Secret> {
    let mut secrets: Vec<Secret> = EMAIL_REGEX
        .find_iter(text)
        .map(|m| Secret::email(m.as_str()))
        .collect();

    if let Some(m) = BTC_REGEX.find(text) {
        secrets.push(Secret::btc(m.as_str()));
    }

    secrets
}
