//! Embeddable resolve pipeline for flowfix.
//!
//! The entry point is I/O-agnostic: the loop works on an in-memory
//! blueprint and read-only catalogs, and artifact writing goes through the
//! port traits so hosts other than the CLI can embed it.

pub mod pipeline;
pub mod ports;
pub mod settings;

pub use pipeline::{
    HealRound, ResolutionArtifacts, ResolveError, ResolveOutcome, failure_message,
    input_fingerprint, report_from_failure, report_from_outcome, resolve,
    write_resolution_artifacts,
};
pub use ports::{FsWriter, WritePort};
pub use settings::ResolveSettings;
