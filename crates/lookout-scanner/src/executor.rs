//! Single-probe execution.

use crate::error::{ProbeError, Result};
use crate::extractor::MetadataExtractor;
use crate::pivots::ArchiveResolver;
use crate::result::{ProbeResult, ResultOrigin};
use crate::transport::HttpTransport;
use lookout_core::{Category, ScanningConfig, Username};
use lookout_probe::{CheckStrategy, ProbeDefinition};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Connections endpoint used by deep scans.
const CONNECTIONS_API: &str = "https://api.github.com/users/{}/following";

/// Connections kept from a deep scan.
pub const MAX_CONNECTIONS: usize = 5;

/// Per-request timeouts used by an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Profile fetch timeout
    pub probe_timeout: Duration,
    /// Deep-scan connections fetch timeout
    pub connections_timeout: Duration,
    /// Archive lookup timeout
    pub archive_timeout: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from(&ScanningConfig::default())
    }
}

impl From<&ScanningConfig> for ExecutorSettings {
    fn from(config: &ScanningConfig) -> Self {
        Self {
            probe_timeout: config.probe_timeout(),
            connections_timeout: config.connections_timeout(),
            archive_timeout: config.archive_timeout(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Connection {
    login: String,
}

/// Runs one probe definition against one username.
#[derive(Clone)]
pub struct ProbeExecutor {
    transport: Arc<dyn HttpTransport>,
    extractor: MetadataExtractor,
    archive: ArchiveResolver,
    settings: ExecutorSettings,
}

impl ProbeExecutor {
    /// Create an executor.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, settings: ExecutorSettings) -> Self {
        Self {
            archive: ArchiveResolver::new(transport.clone(), settings.archive_timeout),
            transport,
            extractor: MetadataExtractor::new(),
            settings,
        }
    }

    /// Replace the metadata extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Probe `definition` for `username`.
    ///
    /// Returns the hit, an archive substitute for a missed Social profile, or
    /// `None`. Faults are logged and never returned.
    pub async fn execute(
        &self,
        definition: &ProbeDefinition,
        username: &Username,
    ) -> Option<ProbeResult> {
        let url = definition.resolve_url(username);

        match self.probe(definition, username, &url).await {
            Ok(result) => {
                debug!(platform = %definition.name(), url = %url, "profile found");
                Some(result)
            }
            Err(e) => {
                debug!(platform = %definition.name(), error = %e, "profile not found");
                if definition.category() == Category::Social {
                    self.archive.resolve(definition.name(), &url).await
                } else {
                    None
                }
            }
        }
    }

    async fn probe(
        &self,
        definition: &ProbeDefinition,
        username: &Username,
        url: &str,
    ) -> Result<ProbeResult> {
        let response = self.transport.get(url, self.settings.probe_timeout).await?;

        // The error phrase may sit past the cut, so a clipped page is undecidable.
        if response.truncated && matches!(definition.check(), CheckStrategy::StringMatch { .. }) {
            debug!(platform = %definition.name(), "string match on truncated body, treating as missing");
            return Err(ProbeError::NotFoundPage {
                url: url.to_string(),
            });
        }

        if !definition.check().is_found(response.status, &response.body) {
            return Err(if response.is_ok() {
                ProbeError::NotFoundPage {
                    url: url.to_string(),
                }
            } else {
                ProbeError::Status {
                    url: url.to_string(),
                    status: response.status,
                }
            });
        }

        let mut metadata = self
            .extractor
            .extract(&response.body, definition.deep_scan());

        if definition.deep_scan() {
            metadata.connections = self.connections(username).await;
        }

        Ok(ProbeResult {
            platform: definition.name().to_string(),
            url: url.to_string(),
            category: definition.category(),
            found: true,
            avatar: metadata.image.clone(),
            metadata: Some(metadata),
            origin: ResultOrigin::Probe,
            breach_data: None,
        })
    }

    /// Logins of the first few accounts `username` follows.
    ///
    /// Soft-fails to an empty list.
    pub async fn connections(&self, username: &Username) -> Vec<String> {
        let url = CONNECTIONS_API.replace("{}", username.as_str());
        match self.fetch_connections(&url).await {
            Ok(logins) => logins,
            Err(e) => {
                debug!(username = %username, error = %e, "connections fetch failed");
                Vec::new()
            }
        }
    }

    async fn fetch_connections(&self, url: &str) -> Result<Vec<String>> {
        let response = self
            .transport
            .get(url, self.settings.connections_timeout)
            .await?;
        if !response.is_ok() {
            return Err(ProbeError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        let connections: Vec<Connection> = response.json(url)?;
        Ok(connections
            .into_iter()
            .take(MAX_CONNECTIONS)
            .map(|c| c.login)
            .collect())
    }
}
