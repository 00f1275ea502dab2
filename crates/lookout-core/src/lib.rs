//! Lookout Core - Foundation crate for the Lookout reconnaissance toolkit.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Lookout crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`Username`, `CaseId`, `Category`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use lookout_core::{AppConfig, Username};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.max_concurrency, 20);
//!
//! let target = Username::new("octocat")?;
//! println!("Investigating {target}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CaseConfig, IntelConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, LookoutError, Result};
pub use types::{CaseId, Category, Timestamp, Username};
