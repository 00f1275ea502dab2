//! Application state management.

use anyhow::Context;
use lookout_case::CaseStore;
use lookout_core::AppConfig;
use lookout_probe::{ProbeLoader, ProbeRegistry};
use lookout_scanner::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use tracing::{info, warn};

/// Collaborators shared by every command.
pub struct AppState {
    /// Effective configuration
    pub config: AppConfig,
    /// Loaded probe definitions
    pub registry: ProbeRegistry,
    /// HTTP seam used by every outbound request
    pub transport: Arc<dyn HttpTransport>,
    /// Case persistence
    pub store: CaseStore,
}

impl AppState {
    /// Build state from configuration with the live HTTP client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::from_config(&config.scanning)
            .context("failed to build HTTP client")?;
        let store = CaseStore::from_config(&config).context("failed to resolve cases directory")?;
        let registry = load_registry(&config);

        info!("Cases directory: {}", store.base_dir().display());

        Ok(Self::with_parts(config, registry, Arc::new(transport), store))
    }

    /// Assemble state from prebuilt parts.
    #[must_use]
    pub fn with_parts(
        config: AppConfig,
        registry: ProbeRegistry,
        transport: Arc<dyn HttpTransport>,
        store: CaseStore,
    ) -> Self {
        Self {
            config,
            registry,
            transport,
            store,
        }
    }
}

/// Load the configured definition file, else the bundled one.
///
/// A missing file yields an empty registry so case commands keep working.
fn load_registry(config: &AppConfig) -> ProbeRegistry {
    let loader = match &config.scanning.platforms_file {
        Some(path) => ProbeLoader::new(path),
        None => match ProbeLoader::with_default_path() {
            Ok(loader) => loader,
            Err(e) => {
                warn!("No probe definitions found: {}", e);
                return ProbeRegistry::new();
            }
        },
    };

    let registry = ProbeRegistry::load_from(&loader);
    info!(
        "Loaded {} probe definitions from {}",
        registry.count(),
        loader.path().display()
    );
    registry
}
