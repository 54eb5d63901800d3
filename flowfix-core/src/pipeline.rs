//! The fixpoint orchestrator: validate → heal → re-validate under a
//! bounded-attempt, stagnation-aware policy.
//!
//! One invocation is single-threaded, synchronous, and free of I/O or
//! suspension points; the attempt bound and the stagnation counter are the
//! only termination guarantees. Catalogs are shared read-only, so separate
//! blueprints may be resolved concurrently without locking.

use crate::ports::WritePort;
use crate::settings::ResolveSettings;
use anyhow::Context;
use chrono::Utc;
use flowfix_catalog::{PortTemplateCatalog, SchemaCatalog};
use flowfix_domain::checks::{check_schemas, check_structure};
use flowfix_domain::healers::{HealContext, builtin_healers};
use flowfix_domain::normalize;
use flowfix_types::blueprint::Blueprint;
use flowfix_types::ops::{HealOp, round_summary_line};
use flowfix_types::report::{
    ResolutionCounts, ResolutionReport, ResolutionStatus, ResolutionVerdict, RoleDeltaRecord,
    RoundSummary, RunInfo, ToolInfo, ViolationRecord,
};
use flowfix_types::violation::{RoleDelta, Violation, sort_violations};
use flowfix_types::wire::ReportV1;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

/// Error type for pipeline results. Exit code 2 = validation failure,
/// 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{}", failure_message(*.attempts, .violations))]
    ValidationFailed {
        /// Validation attempts consumed; 0 when a pre-loop check failed.
        attempts: u32,
        /// Complete, deterministically sorted set from the final attempt.
        violations: Vec<Violation>,
    },
}

impl ResolveError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            ResolveError::ValidationFailed { violations, .. } => violations,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            ResolveError::ValidationFailed { attempts, .. } => *attempts,
        }
    }
}

/// The aggregated failure surface. The header and the two-space-indented
/// per-violation lines are depended on by operators reading logs.
pub fn failure_message(attempts: u32, violations: &[Violation]) -> String {
    let mut out = format!(
        "System blueprint validation failed after {} attempts with {} errors",
        attempts,
        violations.len()
    );
    for violation in violations {
        out.push('\n');
        out.push_str(&violation.report_line());
    }
    out
}

/// One healing round and the operations it performed.
#[derive(Debug, Clone)]
pub struct HealRound {
    pub attempt: u32,
    pub ops: Vec<HealOp>,
}

impl HealRound {
    pub fn summary(&self) -> String {
        round_summary_line(&self.ops)
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// The healed blueprint, ready for the downstream code synthesizer.
    pub blueprint: Blueprint,
    /// Attempt in which validation finally passed.
    pub attempts: u32,
    /// Every operation performed, pre-loop defaults included.
    pub operations: Vec<HealOp>,
    pub rounds: Vec<HealRound>,
    /// Informational declared-vs-effective role notes from the final pass.
    pub role_deltas: Vec<RoleDelta>,
}

struct CheckResults {
    violations: Vec<Violation>,
    role_deltas: Vec<RoleDelta>,
}

fn run_checks(blueprint: &Blueprint, schemas: &SchemaCatalog) -> CheckResults {
    let structural = check_structure(&blueprint.system);
    let mut violations = structural.violations;
    violations.extend(check_schemas(&blueprint.system, schemas));
    CheckResults {
        violations,
        role_deltas: structural.role_deltas,
    }
}

/// Drive a blueprint to a consistent state or a complete diagnostic failure.
pub fn resolve(
    mut blueprint: Blueprint,
    schemas: &SchemaCatalog,
    templates: &PortTemplateCatalog,
    settings: &ResolveSettings,
) -> Result<ResolveOutcome, ResolveError> {
    // Version check runs before anything else; an unsupported declared
    // version bypasses normalization and healing entirely.
    if let Some(version) = &blueprint.schema_version
        && !settings.supported_versions.contains(version)
    {
        return Err(ResolveError::ValidationFailed {
            attempts: 0,
            violations: vec![Violation::UnsupportedSchemaVersion {
                declared: version.clone(),
                supported: settings.supported_versions.clone(),
            }],
        });
    }

    let mut operations = normalize(&mut blueprint, templates, &settings.default_version);
    for op in &operations {
        info!("{}", op.log_line());
    }

    let healers = builtin_healers();
    let mut rounds: Vec<HealRound> = Vec::new();
    let mut attempt = 1u32;
    let mut stagnation = 0u32;
    let mut prev_round_zero = false;

    let mut checks = run_checks(&blueprint, schemas);
    loop {
        if checks.violations.iter().any(Violation::is_fatal) {
            sort_violations(&mut checks.violations);
            return Err(ResolveError::ValidationFailed {
                attempts: attempt,
                violations: checks.violations,
            });
        }
        if checks.violations.is_empty() {
            info!(attempt, "blueprint validated");
            return Ok(ResolveOutcome {
                blueprint,
                attempts: attempt,
                operations,
                rounds,
                role_deltas: checks.role_deltas,
            });
        }

        // Healing round: start marker, component count, one line per
        // operation, then the summary line. The order is a log contract.
        info!("Starting blueprint healing pass");
        info!(
            "System contains {} components",
            blueprint.system.components.len()
        );
        let mut ops = Vec::new();
        {
            let ctx = HealContext {
                schemas,
                templates,
                violations: &checks.violations,
            };
            for healer in &healers {
                let healer_ops = healer.heal(&mut blueprint, &ctx);
                debug!(healer = healer.id(), operations = healer_ops.len(), "healer ran");
                for op in &healer_ops {
                    info!("{}", op.log_line());
                }
                ops.extend(healer_ops);
            }
        }
        info!("{}", round_summary_line(&ops));

        let round_zero = ops.is_empty();
        rounds.push(HealRound {
            attempt,
            ops: ops.clone(),
        });
        operations.extend(ops);

        // Re-validate within the same attempt: a document fully healed in
        // attempt N succeeds in attempt N, and the terminal violation set
        // always reflects the post-heal state.
        checks = run_checks(&blueprint, schemas);
        if checks.violations.is_empty() {
            info!(attempt, "blueprint validated");
            return Ok(ResolveOutcome {
                blueprint,
                attempts: attempt,
                operations,
                rounds,
                role_deltas: checks.role_deltas,
            });
        }

        if attempt > 1 && round_zero && prev_round_zero {
            stagnation += 1;
            if stagnation >= 2 {
                checks
                    .violations
                    .push(Violation::StagnationExceeded { attempts: attempt });
                sort_violations(&mut checks.violations);
                return Err(ResolveError::ValidationFailed {
                    attempts: attempt,
                    violations: checks.violations,
                });
            }
        }
        prev_round_zero = round_zero;

        attempt += 1;
        if attempt > settings.max_attempts {
            sort_violations(&mut checks.violations);
            return Err(ResolveError::ValidationFailed {
                attempts: settings.max_attempts,
                violations: checks.violations,
            });
        }
    }
}

// ── report helpers ───────────────────────────────────────────────────────

pub fn report_from_outcome(outcome: &ResolveOutcome, tool: ToolInfo) -> ResolutionReport {
    ResolutionReport {
        schema: flowfix_types::schema::FLOWFIX_REPORT_V1.to_string(),
        tool,
        run: RunInfo {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
        },
        input: None,
        verdict: ResolutionVerdict {
            status: ResolutionStatus::Resolved,
            attempts: outcome.attempts,
            counts: ResolutionCounts {
                operations: outcome.operations.len() as u64,
                violations: 0,
                role_deltas: outcome.role_deltas.len() as u64,
            },
        },
        rounds: outcome
            .rounds
            .iter()
            .map(|r| RoundSummary {
                attempt: r.attempt,
                operations: r.ops.len() as u64,
                summary: r.summary(),
            })
            .collect(),
        violations: vec![],
        role_deltas: outcome.role_deltas.iter().map(RoleDeltaRecord::from).collect(),
    }
}

pub fn report_from_failure(error: &ResolveError, tool: ToolInfo) -> ResolutionReport {
    let violations = error.violations();
    ResolutionReport {
        schema: flowfix_types::schema::FLOWFIX_REPORT_V1.to_string(),
        tool,
        run: RunInfo {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
        },
        input: None,
        verdict: ResolutionVerdict {
            status: ResolutionStatus::Failed,
            attempts: error.attempts(),
            counts: ResolutionCounts {
                operations: 0,
                violations: violations.len() as u64,
                role_deltas: 0,
            },
        },
        rounds: vec![],
        violations: violations.iter().map(ViolationRecord::from).collect(),
        role_deltas: vec![],
    }
}

/// Hex sha256 of the raw input document, recorded in the report.
pub fn input_fingerprint(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    hex::encode(hasher.finalize())
}

// ── artifact writing ─────────────────────────────────────────────────────

/// Everything a resolution run leaves on disk.
pub struct ResolutionArtifacts {
    /// File name for the healed document, e.g. `healed.yaml`.
    pub healed_file_name: String,
    pub healed_document: String,
    pub report: ResolutionReport,
    /// Unified diff between input and healed document.
    pub patch: String,
}

pub fn write_resolution_artifacts(
    artifacts: &ResolutionArtifacts,
    out_dir: &camino::Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    writer.write_file(
        &out_dir.join(&artifacts.healed_file_name),
        artifacts.healed_document.as_bytes(),
    )?;

    let report_wire = ReportV1::from(&artifacts.report);
    let report_json = serde_json::to_string_pretty(&report_wire).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let resolution_md = flowfix_render::render_report_md(&artifacts.report);
    writer.write_file(&out_dir.join("resolution.md"), resolution_md.as_bytes())?;

    writer.write_file(&out_dir.join("patch.diff"), artifacts.patch.as_bytes())?;

    Ok(())
}
