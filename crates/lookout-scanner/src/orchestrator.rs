//! Reconnaissance orchestrator.
//!
//! This module provides the `ReconOrchestrator` which fans one username out
//! over every registered probe with bounded parallelism, then runs the
//! post-sweep pivots and builds the final [`ReconReport`].

use crate::aggregator::RadarStats;
use crate::alts;
use crate::executor::{ExecutorSettings, ProbeExecutor};
use crate::extractor::MetadataExtractor;
use crate::pivots::{instagram_dork, GravatarPivot, DORK_KEY, DORK_TRIGGER_PLATFORM, GRAVATAR_KEY};
use crate::result::{ProbeResult, ResultOrigin};
use crate::transport::HttpTransport;
use futures::stream::{FuturesUnordered, StreamExt};
use lookout_core::{ScanningConfig, Timestamp, Username};
use lookout_probe::ProbeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Outcome of one reconnaissance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconReport {
    /// Username that was investigated
    pub identifier: String,
    /// Findings keyed by platform name (plus pivot and dork keys)
    pub results: HashMap<String, ProbeResult>,
    /// Radar statistics over `results`
    pub radar: RadarStats,
    /// Alternate usernames, only filled on low yield
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alts: Vec<String>,
    /// When the sweep started
    pub started_at: Timestamp,
    /// When the report was assembled
    pub finished_at: Timestamp,
}

impl ReconReport {
    /// Number of entries with `found = true`.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.results.values().filter(|r| r.found).count()
    }

    /// Entries produced by direct probes or archive substitutes.
    #[must_use]
    pub fn platform_hits(&self) -> HashMap<&str, &ProbeResult> {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r.origin, ResultOrigin::Probe | ResultOrigin::Archive))
            .map(|(k, r)| (k.as_str(), r))
            .collect()
    }

    /// Recompute radar stats after results were changed downstream.
    pub fn refresh_radar(&mut self) {
        self.radar = RadarStats::from_map(&self.results);
    }
}

/// Orchestrates a username sweep across the probe registry.
pub struct ReconOrchestrator {
    /// Probe definitions to run
    registry: ProbeRegistry,
    /// Shared per-probe executor
    executor: ProbeExecutor,
    /// Post-sweep email-guess pivot
    gravatar: GravatarPivot,
    /// Maximum probes in flight
    max_concurrency: usize,
    /// Alts are generated below this many found entries
    low_yield_threshold: usize,
}

impl ReconOrchestrator {
    /// Create an orchestrator using the `[scanning]` settings.
    #[must_use]
    pub fn new(
        registry: ProbeRegistry,
        transport: Arc<dyn HttpTransport>,
        config: &ScanningConfig,
    ) -> Self {
        Self {
            registry,
            executor: ProbeExecutor::new(transport.clone(), ExecutorSettings::from(config)),
            gravatar: GravatarPivot::new(transport, config.gravatar_timeout()),
            max_concurrency: config.max_concurrency.max(1),
            low_yield_threshold: config.low_yield_threshold,
        }
    }

    /// Set the maximum number of concurrent probes.
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Use `extractor` for every probe hit.
    #[must_use]
    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.executor = self.executor.with_extractor(extractor);
        self
    }

    /// Run every registered probe for `username` and collect the hits.
    ///
    /// At most `max_concurrency` probes are in flight at once. Each probe runs
    /// as its own task; this loop is the only writer of the result map.
    pub async fn sweep(&self, username: &Username) -> HashMap<String, ProbeResult> {
        let mut in_flight = FuturesUnordered::new();
        let mut results = HashMap::new();

        for definition in self.registry.get_all() {
            while in_flight.len() >= self.max_concurrency {
                if let Some(joined) = in_flight.next().await {
                    Self::merge(&mut results, joined);
                }
            }

            let executor = self.executor.clone();
            let username = username.clone();
            in_flight.push(tokio::spawn(async move {
                executor.execute(&definition, &username).await
            }));
        }

        while let Some(joined) = in_flight.next().await {
            Self::merge(&mut results, joined);
        }

        results
    }

    fn merge(
        results: &mut HashMap<String, ProbeResult>,
        joined: std::result::Result<Option<ProbeResult>, JoinError>,
    ) {
        match joined {
            Ok(Some(result)) => {
                if results.insert(result.platform.clone(), result).is_some() {
                    debug!("duplicate platform key, keeping latest result");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "probe task aborted"),
        }
    }

    /// Full reconnaissance run: sweep, pivots, alts and radar.
    pub async fn run(&self, username: &Username) -> ReconReport {
        let started_at = Timestamp::now();
        info!(
            username = %username,
            probes = self.registry.count(),
            max_concurrency = self.max_concurrency,
            "starting username sweep"
        );

        let mut results = self.sweep(username).await;

        if let Some(hit) = self.gravatar.search(username).await {
            results.insert(GRAVATAR_KEY.to_string(), hit.into_result());
        }

        if !results.contains_key(DORK_TRIGGER_PLATFORM) {
            results.insert(DORK_KEY.to_string(), instagram_dork(username));
        }

        let found = results.values().filter(|r| r.found).count();
        let alts = if found < self.low_yield_threshold {
            debug!(found, "low yield, generating alternate usernames");
            alts::generate(username.as_str())
        } else {
            Vec::new()
        };

        let radar = RadarStats::from_map(&results);

        info!(
            username = %username,
            found,
            entries = results.len(),
            alts = alts.len(),
            "username sweep complete"
        );

        ReconReport {
            identifier: username.to_string(),
            results,
            radar,
            alts,
            started_at,
            finished_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StaticTransport;
    use lookout_core::Category;
    use lookout_probe::{CheckStrategy, ProbeDefinition};
    use std::time::Duration;

    fn definition(name: &str, category: Category) -> ProbeDefinition {
        ProbeDefinition::new(
            name,
            format!("https://{}.test/{{}}", name.to_lowercase()),
            category,
            CheckStrategy::StatusCode,
            false,
        )
        .expect("valid definition")
    }

    fn bob() -> Username {
        Username::new("bob").expect("valid username")
    }

    #[tokio::test]
    async fn test_sweep_respects_concurrency_bound() {
        let registry = ProbeRegistry::from_definitions(
            (0..30).map(|i| definition(&format!("P{i}"), Category::Other)),
        );
        let transport = Arc::new(StaticTransport::new().with_delay(Duration::from_millis(20)));
        let orchestrator =
            ReconOrchestrator::new(registry, transport.clone(), &ScanningConfig::default())
                .with_max_concurrency(4);

        let results = orchestrator.sweep(&bob()).await;

        assert!(results.is_empty());
        assert_eq!(transport.calls().len(), 30);
        assert!(transport.peak_in_flight() <= 4);
    }

    #[tokio::test]
    async fn test_sweep_collects_hits_by_platform() {
        let registry = ProbeRegistry::from_definitions(vec![
            definition("Alpha", Category::Social),
            definition("Beta", Category::Developer),
            definition("Gamma", Category::Gaming),
        ]);
        let transport = Arc::new(
            StaticTransport::new()
                .with_response("https://alpha.test/bob", 200, "")
                .with_response("https://gamma.test/bob", 200, ""),
        );
        let orchestrator =
            ReconOrchestrator::new(registry, transport, &ScanningConfig::default());

        let results = orchestrator.sweep(&bob()).await;

        let mut keys: Vec<_> = results.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["Alpha", "Gamma"]);
    }

    #[tokio::test]
    async fn test_empty_registry_still_gets_dork_and_alts() {
        let orchestrator = ReconOrchestrator::new(
            ProbeRegistry::new(),
            Arc::new(StaticTransport::new()),
            &ScanningConfig::default(),
        );

        let report = orchestrator.run(&bob()).await;

        assert_eq!(report.results.len(), 1);
        assert!(report.results.contains_key(DORK_KEY));
        assert_eq!(report.found_count(), 0);
        assert!(report.platform_hits().is_empty());
        assert!(!report.alts.is_empty());
        assert_eq!(report.radar, RadarStats::default());
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_instagram_hit_suppresses_dork() {
        let registry = ProbeRegistry::from_definitions(vec![definition("Instagram", Category::Social)]);
        let transport = Arc::new(
            StaticTransport::new().with_response("https://instagram.test/bob", 200, ""),
        );
        let orchestrator =
            ReconOrchestrator::new(registry, transport, &ScanningConfig::default());

        let report = orchestrator.run(&bob()).await;

        assert!(report.results.contains_key("Instagram"));
        assert!(!report.results.contains_key(DORK_KEY));
    }

    #[tokio::test]
    async fn test_gravatar_hit_lands_under_fixed_key() {
        let transport = Arc::new(StaticTransport::new().with_response(
            GravatarPivot::avatar_url("bob@gmail.com"),
            200,
            "",
        ));
        let orchestrator =
            ReconOrchestrator::new(ProbeRegistry::new(), transport, &ScanningConfig::default());

        let report = orchestrator.run(&bob()).await;

        let gravatar = report.results.get(GRAVATAR_KEY).expect("gravatar entry");
        assert_eq!(gravatar.origin, ResultOrigin::Pivot);
        assert_eq!(report.radar.contact, 50);
    }

    #[tokio::test]
    async fn test_yield_at_threshold_skips_alts() {
        let registry = ProbeRegistry::from_definitions(vec![
            definition("Alpha", Category::Tech),
            definition("Beta", Category::Tech),
        ]);
        let transport = Arc::new(
            StaticTransport::new()
                .with_response("https://alpha.test/bob", 200, "")
                .with_response("https://beta.test/bob", 200, ""),
        );
        let orchestrator =
            ReconOrchestrator::new(registry, transport, &ScanningConfig::default());

        let report = orchestrator.run(&bob()).await;

        assert_eq!(report.found_count(), 2);
        assert!(report.alts.is_empty());
        assert_eq!(report.radar.dev, 50);
    }
}
