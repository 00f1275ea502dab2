//! Lookout Intel - Single-shot lookups and identity scoring.
//!
//! Complements the username sweep in `lookout-scanner` with:
//! - [`email`]: shape validation, address variations and a Gravatar check
//! - [`breach`]: commit-email pivot checked against infostealer logs
//! - [`phone`]: offline validation and description of phone numbers
//! - [`scoring`]: correlation, risk, identity confidence and DOB exposure
//!
//! All network access goes through `lookout_scanner::HttpTransport`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod breach;
pub mod email;
pub mod error;
pub mod phone;
pub mod scoring;

pub use breach::{attach_breach, BreachChecker, BreachReport, BreachStatus};
pub use email::{email_variations, EmailLookup, EmailReport, GravatarProfile};
pub use error::{IntelError, Result};
pub use phone::{parse_phone, phone_lookup, LineType, PhoneDetails, PhoneDork, PhoneReport};
pub use scoring::{
    calculate_risk, check_dob_exposure, correlate, identity_confidence, weekday_index,
    ConfidenceInputs, Correlation, IdentityConfidence, Level, RiskAssessment,
};
