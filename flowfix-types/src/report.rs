//! The resolution report artifact.
//!
//! Written next to the healed document so operators and CI can inspect a
//! run without re-parsing logs. Mirrored by `wire::ReportV1` for disk
//! serialization.

use crate::violation::{EffectiveRole, RoleDelta, Violation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Schema identifier, `flowfix.report.v1`.
    pub schema: String,

    pub tool: ToolInfo,

    pub run: RunInfo,

    /// Input document provenance; filled by the caller that owns the I/O.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,

    pub verdict: ResolutionVerdict,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundSummary>,

    /// Remaining violations, deterministically sorted. Empty on success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationRecord>,

    /// Informational declared-vs-effective role notes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_deltas: Vec<RoleDeltaRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    pub path: String,

    /// Hex sha256 of the raw input document.
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionVerdict {
    pub status: ResolutionStatus,

    /// Validation attempts consumed (0 when a pre-loop check failed).
    pub attempts: u32,

    pub counts: ResolutionCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Resolved,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionCounts {
    #[serde(default)]
    pub operations: u64,

    #[serde(default)]
    pub violations: u64,

    #[serde(default)]
    pub role_deltas: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub attempt: u32,
    pub operations: u64,
    /// The round's summary log line.
    pub summary: String,
}

/// The stable `(category, locator, message)` triple of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub category: String,
    pub locator: String,
    pub message: String,
}

impl From<&Violation> for ViolationRecord {
    fn from(v: &Violation) -> Self {
        Self {
            category: v.category().to_string(),
            locator: v.locator(),
            message: v.message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDeltaRecord {
    pub component: String,
    pub declared: String,
    pub effective: EffectiveRole,
}

impl From<&RoleDelta> for RoleDeltaRecord {
    fn from(d: &RoleDelta) -> Self {
        Self {
            component: d.component.clone(),
            declared: d.declared.as_str().to_string(),
            effective: d.effective,
        }
    }
}
