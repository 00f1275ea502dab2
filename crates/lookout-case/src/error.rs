use lookout_core::LookoutError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("case not found: {case_id}")]
    NotFound { case_id: String },

    #[error(transparent)]
    Core(#[from] LookoutError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CaseError>;
