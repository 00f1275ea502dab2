use lookout_scanner::ProbeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntelError {
    #[error("invalid phone number '{number}': {reason}")]
    InvalidPhone { number: String, reason: String },

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("lookup failed: {0}")]
    Lookup(#[from] ProbeError),
}

pub type Result<T> = std::result::Result<T, IntelError>;
