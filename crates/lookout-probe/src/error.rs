//! Error types for the probe definition subsystem.

use thiserror::Error;

/// Errors that can occur while loading or querying probe definitions.
#[derive(Error, Debug)]
pub enum ProbeDefinitionError {
    /// Probe definition not found
    #[error("probe definition not found: {name}")]
    NotFound {
        /// The platform name that was not found
        name: String,
    },

    /// Failed to read a definition file
    #[error("failed to load probe definitions from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Definition file is not valid TOML/JSON
    #[error("failed to parse probe definitions in {path}: {reason}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// Parser message
        reason: String,
    },

    /// Definition file has an extension we don't read
    #[error("unsupported probe definition format: {path} (expected .toml or .json)")]
    UnsupportedFormat {
        /// Path to the definition file
        path: String,
    },

    /// A single entry failed validation
    #[error("invalid probe definition for {name}: {reason}")]
    ValidationError {
        /// Platform name (or a positional label when the name is missing)
        name: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Two entries share a platform name
    #[error("duplicate probe definition for platform {name}")]
    Duplicate {
        /// Platform name
        name: String,
    },

    /// Default definition file could not be located
    #[error("probe definitions file not found at {path}")]
    FileNotFound {
        /// Expected file path
        path: String,
    },

    /// I/O error while locating definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for probe definition operations.
pub type Result<T> = std::result::Result<T, ProbeDefinitionError>;
