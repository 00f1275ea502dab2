//! Lookout Probe - Platform probe definitions for username reconnaissance.
//!
//! This crate provides the typed probe definitions that drive a username
//! sweep. It handles loading definition files (TOML or JSON), validating each
//! entry individually, and caching the result in an ordered registry.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed platform probes
//! - **Loader** ([`loader`]): File loading from `probe-definitions/`
//! - **Registry** ([`registry`]): Ordered in-memory cache with query support
//! - **Errors** ([`error`]): Probe definition error types
//!
//! # Example
//!
//! ```rust,no_run
//! use lookout_probe::{ProbeLoader, ProbeRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = ProbeLoader::with_default_path()?;
//! let registry = ProbeRegistry::load_from(&loader);
//!
//! for probe in registry.get_all() {
//!     println!("{} ({})", probe.name(), probe.category());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{CheckStrategy, ProbeDefinition, RawProbeDefinition, URL_PLACEHOLDER};
pub use error::{ProbeDefinitionError, Result};
pub use loader::ProbeLoader;
pub use registry::ProbeRegistry;
