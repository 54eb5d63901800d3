//! Healing operation log entries.
//!
//! Each healer returns the operations it performed; the orchestrator counts
//! them for stagnation tracking and renders one log line per entry. The
//! binding-generation and policy lines are external contracts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealOp {
    /// Binding inference paired an unbound producer with an unbound consumer.
    GeneratedBinding {
        producer: String,
        producer_port: String,
        consumer: String,
        consumer_port: String,
    },
    /// A named coercion was attached to an incompatible binding.
    AttachedTransformation {
        producer: String,
        producer_port: String,
        consumer: String,
        consumer_port: String,
        transformation: String,
    },
    /// The consumer port's declared schema was relaxed to the universal schema.
    RelaxedConsumerSchema {
        consumer: String,
        consumer_port: String,
        previous_schema: String,
    },
    /// The canonical default policy block was inserted.
    AddedPolicyDefaults,
    /// A missing `schema_version` was defaulted before the first round.
    DefaultedSchemaVersion { version: String },
}

impl HealOp {
    /// One diagnostic log line per operation.
    pub fn log_line(&self) -> String {
        match self {
            HealOp::GeneratedBinding {
                producer,
                producer_port,
                consumer,
                consumer_port,
            } => format!(
                "Generated binding: {}.{} → {}.{}",
                producer, producer_port, consumer, consumer_port
            ),
            HealOp::AttachedTransformation {
                producer,
                producer_port,
                consumer,
                consumer_port,
                transformation,
            } => format!(
                "Added transformation {} to binding {}.{} → {}.{}",
                transformation, producer, producer_port, consumer, consumer_port
            ),
            HealOp::RelaxedConsumerSchema {
                consumer,
                consumer_port,
                previous_schema,
            } => format!(
                "Relaxed {}.{} schema {} → any",
                consumer, consumer_port, previous_schema
            ),
            HealOp::AddedPolicyDefaults => "Added missing policy block".to_string(),
            HealOp::DefaultedSchemaVersion { version } => {
                format!("Defaulted schema version to {}", version)
            }
        }
    }

    /// Short label used in round summaries.
    pub fn summary_label(&self) -> &'static str {
        match self {
            HealOp::GeneratedBinding { .. } => "generated_binding",
            HealOp::AttachedTransformation { .. } => "attached_transformation",
            HealOp::RelaxedConsumerSchema { .. } => "relaxed_schema",
            HealOp::AddedPolicyDefaults => "policy_defaults",
            HealOp::DefaultedSchemaVersion { .. } => "schema_version_default",
        }
    }
}

/// The round-summary log line: either the operation count with a
/// comma-joined label list, or the fixed no-op phrasing.
pub fn round_summary_line(ops: &[HealOp]) -> String {
    if ops.is_empty() {
        "Blueprint healing completed - no issues found".to_string()
    } else {
        let labels: Vec<&str> = ops.iter().map(|op| op.summary_label()).collect();
        format!(
            "Blueprint healing completed with {} operations: {}",
            ops.len(),
            labels.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generated_binding_line_is_verbatim() {
        let op = HealOp::GeneratedBinding {
            producer: "event_source".to_string(),
            producer_port: "output_main".to_string(),
            consumer: "event_store".to_string(),
            consumer_port: "input_main".to_string(),
        };
        assert_eq!(
            op.log_line(),
            "Generated binding: event_source.output_main → event_store.input_main"
        );
    }

    #[test]
    fn policy_line_is_verbatim() {
        assert_eq!(HealOp::AddedPolicyDefaults.log_line(), "Added missing policy block");
    }

    #[test]
    fn summary_line_with_operations() {
        let ops = vec![
            HealOp::GeneratedBinding {
                producer: "a".to_string(),
                producer_port: "output_main".to_string(),
                consumer: "b".to_string(),
                consumer_port: "input_main".to_string(),
            },
            HealOp::AddedPolicyDefaults,
        ];
        assert_eq!(
            round_summary_line(&ops),
            "Blueprint healing completed with 2 operations: generated_binding, policy_defaults"
        );
    }

    #[test]
    fn summary_line_with_no_operations() {
        assert_eq!(
            round_summary_line(&[]),
            "Blueprint healing completed - no issues found"
        );
    }
}
