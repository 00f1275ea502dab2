//! Command handlers.

pub mod case;
pub mod platforms;
pub mod scan;
