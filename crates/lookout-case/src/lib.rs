//! Lookout Case - Flat JSON case storage.
//!
//! Each case lives in its own `case_<uuid>` directory under a base
//! directory:
//!
//! ```text
//! cases/
//!   case_550e8400-e29b-41d4-a716-446655440000/
//!     metadata.json        # name, analyst, scope, timestamps
//!     investigation.json   # latest investigation output
//!     analyst_notes.json   # free-form notes object
//!     evidence.json        # append-only evidence log
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod store;
pub mod types;

pub use error::{CaseError, Result};
pub use store::CaseStore;
pub use types::{CaseFile, CaseMetadata, CaseScope, CaseStatus, EvidenceEntry, EvidenceInput};
