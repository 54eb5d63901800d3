//! Deterministic analysis and repair engine for flowfix blueprints.
//!
//! Everything here is pure in-memory graph work: no I/O, no suspension
//! points, no shared mutable state. The orchestrator in `flowfix-core`
//! drives these pieces in a bounded loop:
//!
//! - [`normalize`] applies port templates and defaults a missing schema
//!   version, once, before the first validation round.
//! - [`checks`] produce violations (and informational role deltas).
//! - [`healers`] repair healable violation categories, one idempotent
//!   transform at a time.

pub mod checks;
pub mod healers;
mod index;
mod normalize;

pub use index::SystemIndex;
pub use normalize::normalize;
