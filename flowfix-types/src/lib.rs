//! Shared DTOs (schemas-as-code) for the flowfix workspace.
//!
//! # Design constraints
//! - These types are serialized to disk and consumed by the downstream
//!   component-code synthesizer.
//! - Be conservative with breaking changes.
//! - Violation categories and their message strings live in exactly one
//!   place (`violation`), so the compatibility formats cannot drift
//!   between validator and logger.

pub mod blueprint;
pub mod ops;
pub mod report;
pub mod violation;
pub mod wire;

/// Schema identifiers and supported blueprint versions.
pub mod schema {
    /// Report artifact schema id.
    pub const FLOWFIX_REPORT_V1: &str = "flowfix.report.v1";

    /// Blueprint schema versions this engine resolves.
    pub const SUPPORTED_BLUEPRINT_VERSIONS: &[&str] = &["1.0.0"];

    /// Version assigned when a document omits `schema_version`.
    pub const DEFAULT_BLUEPRINT_VERSION: &str = "1.0.0";

    /// The universal schema: assignable to and from everything.
    pub const ANY_SCHEMA: &str = "any";
}
