//! Wire form of the resolution report (schema-exact).

use crate::report::{
    ResolutionReport, ResolutionStatus, RoleDeltaRecord, RoundSummary, ViolationRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportV1 {
    pub schema: String,

    pub tool: ToolInfoV1,

    pub run: RunInfoV1,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfoV1>,

    pub verdict: VerdictV1,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundSummary>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_deltas: Vec<RoleDeltaRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfoV1 {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfoV1 {
    pub run_id: String,
    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfoV1 {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictV1 {
    pub status: ResolutionStatus,
    pub attempts: u32,
    pub operations: u64,
    pub violations: u64,
    pub role_deltas: u64,
}

impl From<&ResolutionReport> for ReportV1 {
    fn from(r: &ResolutionReport) -> Self {
        ReportV1 {
            schema: r.schema.clone(),
            tool: ToolInfoV1 {
                name: r.tool.name.clone(),
                version: r
                    .tool
                    .version
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                commit: r.tool.commit.clone(),
            },
            run: RunInfoV1 {
                run_id: r.run.run_id.to_string(),
                started_at: r.run.started_at.to_rfc3339(),
                ended_at: r.run.ended_at.map(|t| t.to_rfc3339()),
            },
            input: r.input.as_ref().map(|i| InputInfoV1 {
                path: i.path.clone(),
                sha256: i.sha256.clone(),
            }),
            verdict: VerdictV1 {
                status: r.verdict.status,
                attempts: r.verdict.attempts,
                operations: r.verdict.counts.operations,
                violations: r.verdict.counts.violations,
                role_deltas: r.verdict.counts.role_deltas,
            },
            rounds: r.rounds.clone(),
            violations: r.violations.clone(),
            role_deltas: r.role_deltas.clone(),
        }
    }
}
