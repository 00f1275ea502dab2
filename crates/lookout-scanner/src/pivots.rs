//! Fallback and pivot resolvers.
//!
//! - [`ArchiveResolver`]: Wayback Machine snapshot for a missed social profile.
//! - [`GravatarPivot`]: guess `<username>@<provider>` addresses and look for an avatar.
//! - [`instagram_dork`]: manual search link injected when Instagram was missed.

use crate::error::Result;
use crate::result::{MetadataBlock, ProbeResult, ResultOrigin, Secret};
use crate::transport::HttpTransport;
use lookout_core::{Category, Username};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Snapshot-availability endpoint.
pub const WAYBACK_API: &str = "http://archive.org/wayback/available";

/// Bio attached to archive substitutes.
pub const ARCHIVE_BIO: &str = "Profile deleted. Found in Wayback Machine.";

/// Mail providers tried by the Gravatar pivot, in trial order.
///
/// The order is part of the contract: the first provider with an avatar is
/// the one reported.
pub const GRAVATAR_PROVIDERS: [&str; 4] = ["gmail.com", "yahoo.com", "hotmail.com", "protonmail.com"];

/// Result-map key for a Gravatar hit.
pub const GRAVATAR_KEY: &str = "Gravatar";

/// Platform whose absence triggers the search dork.
pub const DORK_TRIGGER_PLATFORM: &str = "Instagram";

/// Result-map key for the search dork.
pub const DORK_KEY: &str = "Instagram (Dork)";

#[derive(Debug, Deserialize)]
struct WaybackResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<Snapshot>,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    url: String,
}

/// Looks up archived copies of profile URLs.
#[derive(Clone)]
pub struct ArchiveResolver {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl ArchiveResolver {
    /// Create a resolver.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Availability query URL for `target`.
    #[must_use]
    pub fn lookup_url(target: &str) -> String {
        format!("{WAYBACK_API}?url={}", urlencoding::encode(target))
    }

    /// Closest snapshot URL for `target`, if one exists.
    pub async fn closest_snapshot(&self, target: &str) -> Result<Option<String>> {
        let api_url = Self::lookup_url(target);
        let response = self.transport.get(&api_url, self.timeout).await?;
        if !response.is_ok() {
            return Ok(None);
        }
        let parsed: WaybackResponse = response.json(&api_url)?;
        Ok(parsed.archived_snapshots.closest.map(|s| s.url))
    }

    /// Build an `Archive` substitute for a missed profile, or nothing.
    ///
    /// Soft-fails: lookup errors are logged and yield `None`.
    pub async fn resolve(&self, platform: &str, profile_url: &str) -> Option<ProbeResult> {
        match self.closest_snapshot(profile_url).await {
            Ok(Some(snapshot)) => {
                debug!(platform = %platform, snapshot = %snapshot, "archived profile found");
                Some(ProbeResult {
                    platform: platform.to_string(),
                    url: snapshot,
                    category: Category::Archive,
                    found: true,
                    metadata: Some(MetadataBlock::with_bio(ARCHIVE_BIO)),
                    avatar: None,
                    origin: ResultOrigin::Archive,
                    breach_data: None,
                })
            }
            Ok(None) => None,
            Err(e) => {
                debug!(platform = %platform, error = %e, "archive lookup failed");
                None
            }
        }
    }
}

/// A guessed address with a public avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravatarHit {
    /// Guessed email address
    pub email: String,
    /// Avatar image URL that answered 200
    pub image_url: String,
}

impl GravatarHit {
    /// Result-map entry for this hit.
    #[must_use]
    pub fn into_result(self) -> ProbeResult {
        ProbeResult {
            platform: GRAVATAR_KEY.to_string(),
            url: self.image_url.clone(),
            category: Category::Contact,
            found: true,
            metadata: Some(MetadataBlock {
                secrets: vec![Secret::email(self.email)],
                ..MetadataBlock::default()
            }),
            avatar: Some(self.image_url),
            origin: ResultOrigin::Pivot,
            breach_data: None,
        }
    }
}

/// Email-guess pivot against Gravatar.
#[derive(Clone)]
pub struct GravatarPivot {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl GravatarPivot {
    /// Create a pivot.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Candidate addresses in trial order.
    #[must_use]
    pub fn candidate_emails(username: &Username) -> Vec<String> {
        GRAVATAR_PROVIDERS
            .iter()
            .map(|provider| format!("{username}@{provider}"))
            .collect()
    }

    /// Hex digest identifying `email` on Gravatar.
    #[must_use]
    pub fn digest(email: &str) -> String {
        hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()))
    }

    /// Avatar URL that answers 404 when no image is registered.
    #[must_use]
    pub fn avatar_url(email: &str) -> String {
        format!("https://www.gravatar.com/avatar/{}?d=404", Self::digest(email))
    }

    /// Public profile URL for `email`.
    #[must_use]
    pub fn profile_url(email: &str) -> String {
        format!("https://www.gravatar.com/{}", Self::digest(email))
    }

    /// Whether `email` has a registered avatar.
    pub async fn has_avatar(&self, email: &str) -> Result<bool> {
        let response = self.transport.get(&Self::avatar_url(email), self.timeout).await?;
        Ok(response.is_ok())
    }

    /// Try each candidate in order and stop at the first avatar.
    pub async fn search(&self, username: &Username) -> Option<GravatarHit> {
        for email in Self::candidate_emails(username) {
            match self.has_avatar(&email).await {
                Ok(true) => {
                    debug!(email = %email, "gravatar pivot hit");
                    return Some(GravatarHit {
                        image_url: Self::avatar_url(&email),
                        email,
                    });
                }
                Ok(false) => {}
                Err(e) => debug!(email = %email, error = %e, "gravatar probe failed"),
            }
        }
        None
    }
}

/// Manual search link for an Instagram profile that wasn't found directly.
#[must_use]
pub fn instagram_dork(username: &Username) -> ProbeResult {
    let query = urlencoding::encode(username.as_str());
    ProbeResult {
        platform: "Google".to_string(),
        url: format!("https://www.google.com/search?q=site:instagram.com+%22{query}%22"),
        category: Category::Search,
        found: false,
        metadata: Some(MetadataBlock::with_bio("Manual Search Link")),
        avatar: None,
        origin: ResultOrigin::Dork,
        breach_data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StaticTransport;

    fn user(name: &str) -> Username {
        Username::new(name).expect("valid username")
    }

    #[test]
    fn test_lookup_url_encodes_target() {
        assert_eq!(
            ArchiveResolver::lookup_url("https://x.test/u/bob"),
            "http://archive.org/wayback/available?url=https%3A%2F%2Fx.test%2Fu%2Fbob"
        );
    }

    #[tokio::test]
    async fn test_archive_resolver_hit() {
        let target = "https://alpha.test/bob";
        let transport = StaticTransport::new().with_response(
            ArchiveResolver::lookup_url(target),
            200,
            r#"{"archived_snapshots": {"closest": {"available": true, "url": "http://web.archive.org/web/2019/https://alpha.test/bob", "status": "200"}}}"#,
        );
        let resolver = ArchiveResolver::new(Arc::new(transport), Duration::from_secs(3));

        let result = resolver.resolve("Alpha", target).await.expect("snapshot found");
        assert_eq!(result.category, Category::Archive);
        assert!(result.found);
        assert_eq!(result.origin, ResultOrigin::Archive);
        assert_eq!(result.url, "http://web.archive.org/web/2019/https://alpha.test/bob");
        assert_eq!(
            result.metadata.and_then(|m| m.bio).as_deref(),
            Some(ARCHIVE_BIO)
        );
    }

    #[tokio::test]
    async fn test_archive_resolver_soft_fails() {
        let empty = "https://empty.test/bob";
        let broken = "https://broken.test/bob";
        let down = "https://down.test/bob";
        let transport = StaticTransport::new()
            .with_response(ArchiveResolver::lookup_url(empty), 200, r#"{"archived_snapshots": {}}"#)
            .with_response(ArchiveResolver::lookup_url(broken), 200, "<html>rate limited</html>")
            .with_failure(ArchiveResolver::lookup_url(down), "dns failure");
        let resolver = ArchiveResolver::new(Arc::new(transport), Duration::from_secs(3));

        assert!(resolver.resolve("A", empty).await.is_none());
        assert!(resolver.resolve("B", broken).await.is_none());
        assert!(resolver.resolve("C", down).await.is_none());
        assert!(resolver.resolve("D", "https://never.test/bob").await.is_none());
    }

    #[test]
    fn test_gravatar_candidates_in_order() {
        assert_eq!(
            GravatarPivot::candidate_emails(&user("bob")),
            vec![
                "bob@gmail.com",
                "bob@yahoo.com",
                "bob@hotmail.com",
                "bob@protonmail.com"
            ]
        );
    }

    #[test]
    fn test_gravatar_digest_normalizes() {
        assert_eq!(
            GravatarPivot::digest("  Bob@Gmail.com "),
            GravatarPivot::digest("bob@gmail.com")
        );
        assert_eq!(GravatarPivot::digest("bob@gmail.com").len(), 64);
    }

    #[tokio::test]
    async fn test_gravatar_first_match_wins() {
        // Both yahoo and protonmail resolve; yahoo comes first
        let transport = Arc::new(
            StaticTransport::new()
                .with_failure(GravatarPivot::avatar_url("bob@gmail.com"), "reset")
                .with_response(GravatarPivot::avatar_url("bob@yahoo.com"), 200, "")
                .with_response(GravatarPivot::avatar_url("bob@protonmail.com"), 200, ""),
        );
        let pivot = GravatarPivot::new(transport.clone(), Duration::from_secs(2));

        let hit = pivot.search(&user("bob")).await.expect("pivot hit");
        assert_eq!(hit.email, "bob@yahoo.com");
        assert_eq!(transport.calls().len(), 2);
        assert!(!transport.was_called(&GravatarPivot::avatar_url("bob@hotmail.com")));

        let result = hit.into_result();
        assert_eq!(result.platform, GRAVATAR_KEY);
        assert_eq!(result.category, Category::Contact);
        assert_eq!(result.avatar.as_deref(), Some(result.url.as_str()));
        assert_eq!(result.secrets(), &[Secret::email("bob@yahoo.com")]);
    }

    #[tokio::test]
    async fn test_gravatar_no_match() {
        let transport = Arc::new(StaticTransport::new());
        let pivot = GravatarPivot::new(transport.clone(), Duration::from_secs(2));
        assert!(pivot.search(&user("bob")).await.is_none());
        assert_eq!(transport.calls().len(), GRAVATAR_PROVIDERS.len());
    }

    #[test]
    fn test_instagram_dork() {
        let dork = instagram_dork(&user("bob.smith"));
        assert_eq!(dork.platform, "Google");
        assert_eq!(
            dork.url,
            "https://www.google.com/search?q=site:instagram.com+%22bob.smith%22"
        );
        assert!(!dork.found);
        assert!(dork.is_synthetic());
        assert_eq!(dork.category, Category::Search);
    }
}
