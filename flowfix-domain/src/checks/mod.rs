//! Validation passes over a normalized blueprint.
//!
//! Both checkers are read-only and return violation sets; neither mutates
//! the blueprint or short-circuits. The orchestrator decides what is fatal.

pub mod schemas;
pub mod structural;

pub use schemas::check_schemas;
pub use structural::{StructuralReport, check_structure};
