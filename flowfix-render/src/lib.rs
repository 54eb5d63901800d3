//! Rendering helpers (markdown) for human-readable artifacts.

use flowfix_types::report::{ResolutionReport, ResolutionStatus};

pub fn render_report_md(report: &ResolutionReport) -> String {
    let mut out = String::new();
    out.push_str("# flowfix resolution\n\n");
    out.push_str(&format!(
        "- Status: `{}`\n",
        match report.verdict.status {
            ResolutionStatus::Resolved => "resolved",
            ResolutionStatus::Failed => "failed",
        }
    ));
    out.push_str(&format!("- Attempts: {}\n", report.verdict.attempts));
    out.push_str(&format!(
        "- Operations: {}\n",
        report.verdict.counts.operations
    ));
    if let Some(input) = &report.input {
        out.push_str(&format!("- Input: `{}` (sha256 {})\n", input.path, input.sha256));
    }
    out.push('\n');

    if !report.rounds.is_empty() {
        out.push_str("## Healing rounds\n\n");
        for round in &report.rounds {
            out.push_str(&format!(
                "- Attempt {}: {} operations ({})\n",
                round.attempt, round.operations, round.summary
            ));
        }
        out.push('\n');
    }

    if !report.violations.is_empty() {
        out.push_str("## Remaining violations\n\n");
        for violation in &report.violations {
            out.push_str(&format!(
                "- `{}` at `{}`: {}\n",
                violation.category, violation.locator, violation.message
            ));
        }
        out.push('\n');
    }

    if !report.role_deltas.is_empty() {
        out.push_str("## Role deltas (informational)\n\n");
        for delta in &report.role_deltas {
            out.push_str(&format!(
                "- `{}` declared `{}` but is {} by topology\n",
                delta.component,
                delta.declared,
                delta.effective.as_str()
            ));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flowfix_types::report::{
        InputInfo, ResolutionCounts, ResolutionVerdict, RoundSummary, RunInfo, ToolInfo,
        ViolationRecord,
    };
    use uuid::Uuid;

    fn report(status: ResolutionStatus) -> ResolutionReport {
        ResolutionReport {
            schema: flowfix_types::schema::FLOWFIX_REPORT_V1.to_string(),
            tool: ToolInfo {
                name: "flowfix".to_string(),
                version: Some("0.1.0".to_string()),
                commit: None,
            },
            run: RunInfo {
                run_id: Uuid::nil(),
                started_at: Utc::now(),
                ended_at: None,
            },
            input: Some(InputInfo {
                path: "blueprint.yaml".to_string(),
                sha256: "deadbeef".to_string(),
            }),
            verdict: ResolutionVerdict {
                status,
                attempts: 1,
                counts: ResolutionCounts {
                    operations: 2,
                    violations: 0,
                    role_deltas: 0,
                },
            },
            rounds: vec![RoundSummary {
                attempt: 1,
                operations: 2,
                summary: "Blueprint healing completed with 2 operations: generated_binding, policy_defaults".to_string(),
            }],
            violations: vec![],
            role_deltas: vec![],
        }
    }

    #[test]
    fn resolved_report_lists_rounds() {
        let md = render_report_md(&report(ResolutionStatus::Resolved));
        assert!(md.contains("- Status: `resolved`"));
        assert!(md.contains("## Healing rounds"));
        assert!(md.contains("- Attempt 1: 2 operations"));
        assert!(md.contains("blueprint.yaml"));
    }

    #[test]
    fn failed_report_lists_violations() {
        let mut r = report(ResolutionStatus::Failed);
        r.violations.push(ViolationRecord {
            category: "binding.missing".to_string(),
            locator: "sink.input_main".to_string(),
            message: "Required port sink.input_main is unbound".to_string(),
        });
        let md = render_report_md(&r);
        assert!(md.contains("- Status: `failed`"));
        assert!(md.contains("## Remaining violations"));
        assert!(md.contains("`binding.missing` at `sink.input_main`"));
    }
}
