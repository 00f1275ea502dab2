//! Lookout Scanner - Username reconnaissance pipeline.
//!
//! This crate probes a registry of platforms for a username, concurrently and
//! with bounded parallelism, then runs the fallback pivots and folds every
//! finding into fixed-axis radar statistics.
//!
//! # Pipeline
//!
//! 1. [`ReconOrchestrator`] fans out one [`ProbeExecutor`] call per
//!    registered platform (at most `max_concurrency` in flight).
//! 2. Each executor fetches the profile URL, decides existence, and runs the
//!    [`MetadataExtractor`] on hits. Social misses fall back to the
//!    [`ArchiveResolver`].
//! 3. After the sweep: one [`GravatarPivot`] search and, if Instagram was
//!    missed, a manual search dork entry.
//! 4. Low yield triggers the [`alts`] generator.
//! 5. [`RadarStats`] summarizes the result map.
//!
//! Network faults never escape a probe: every fetch either produces a
//! result or is logged and treated as "not found".
//!
//! # Example
//!
//! ```rust,ignore
//! use lookout_scanner::{ReconOrchestrator, ReqwestTransport};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(ReqwestTransport::from_config(&config.scanning)?);
//! let orchestrator = ReconOrchestrator::new(registry, transport, &config.scanning);
//! let report = orchestrator.run(&Username::new("octocat")?).await;
//! println!("{} hits, radar {:?}", report.found_count(), report.radar);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregator;
pub mod alts;
pub mod demographics;
pub mod error;
pub mod executor;
pub mod extractor;
pub mod orchestrator;
pub mod pivots;
pub mod result;
pub mod transport;

// Re-export commonly used types
pub use aggregator::{RadarAxis, RadarStats, RADAR_CEILING};
pub use demographics::{DemographicClassifier, NameHint, NameTableClassifier};
pub use error::{ProbeError, Result};
pub use executor::{ExecutorSettings, ProbeExecutor};
pub use extractor::MetadataExtractor;
pub use orchestrator::{ReconOrchestrator, ReconReport};
pub use pivots::{ArchiveResolver, GravatarHit, GravatarPivot};
pub use result::{
    BreachAttachment, Demographic, MetadataBlock, ProbeResult, ResultOrigin, Secret, SecretKind,
};
pub use transport::{
    FetchResponse, HttpTransport, ReqwestTransport, StaticTransport, MAX_BODY_BYTES,
};
