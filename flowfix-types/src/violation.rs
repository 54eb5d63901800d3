//! The closed violation taxonomy.
//!
//! Every category is a tagged variant; `category()` and `message()` are the
//! single source of truth for the strings operators and tests depend on.
//! The schema-mismatch message format in particular is an external contract
//! and must not drift.

use crate::blueprint::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category identifiers, stable across releases.
pub mod categories {
    pub const UNKNOWN_REFERENCE: &str = "structural.unknown_reference";
    pub const MISSING_BINDING: &str = "binding.missing";
    pub const SCHEMA_COMPATIBILITY: &str = "binding.schema_compatibility";
    pub const UNSUPPORTED_SCHEMA_VERSION: &str = "schema_version.unsupported";
    pub const STAGNATION_EXCEEDED: &str = "healing.stagnation_exceeded";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    /// A binding endpoint names a component or port that does not exist.
    /// Fatal: indicates a malformed document upstream, never healed.
    UnknownReference {
        /// The binding edge, `producer.port → consumer.port`.
        binding: String,
        /// What failed to resolve, e.g. `component 'event_store'`.
        reference: String,
    },
    /// A non-optional port with no direction-appropriate binding.
    MissingBinding { component: String, port: String },
    /// Producer and consumer schemas are incompatible and the binding
    /// carries no transformation.
    SchemaCompatibility {
        producer: String,
        producer_port: String,
        producer_schema: String,
        consumer: String,
        consumer_port: String,
        consumer_schema: String,
    },
    /// Declared schema version is outside the supported set. Fatal,
    /// checked once before any healing round.
    UnsupportedSchemaVersion {
        declared: String,
        supported: Vec<String>,
    },
    /// Synthesized by the orchestrator when consecutive healing rounds
    /// make no progress. Terminal, not a validator category.
    StagnationExceeded { attempts: u32 },
}

impl Violation {
    pub fn category(&self) -> &'static str {
        match self {
            Violation::UnknownReference { .. } => categories::UNKNOWN_REFERENCE,
            Violation::MissingBinding { .. } => categories::MISSING_BINDING,
            Violation::SchemaCompatibility { .. } => categories::SCHEMA_COMPATIBILITY,
            Violation::UnsupportedSchemaVersion { .. } => categories::UNSUPPORTED_SCHEMA_VERSION,
            Violation::StagnationExceeded { .. } => categories::STAGNATION_EXCEEDED,
        }
    }

    /// Where in the document the violation points.
    pub fn locator(&self) -> String {
        match self {
            Violation::UnknownReference { binding, .. } => binding.clone(),
            Violation::MissingBinding { component, port } => format!("{}.{}", component, port),
            Violation::SchemaCompatibility {
                producer,
                producer_port,
                consumer,
                consumer_port,
                ..
            } => format!(
                "{}.{} → {}.{}",
                producer, producer_port, consumer, consumer_port
            ),
            Violation::UnsupportedSchemaVersion { .. } => "schema_version".to_string(),
            Violation::StagnationExceeded { .. } => "healing".to_string(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Violation::UnknownReference { binding, reference } => {
                format!("Unknown reference in binding {}: {}", binding, reference)
            }
            Violation::MissingBinding { component, port } => {
                format!("Required port {}.{} is unbound", component, port)
            }
            Violation::SchemaCompatibility {
                producer,
                producer_port,
                producer_schema,
                consumer,
                consumer_port,
                consumer_schema,
            } => format!(
                "Schema mismatch without transformation: {}.{} ({}) → {}.{} ({})",
                producer, producer_port, producer_schema, consumer, consumer_port, consumer_schema
            ),
            Violation::UnsupportedSchemaVersion { declared, supported } => format!(
                "Unsupported blueprint schema version {} (supported: {})",
                declared,
                supported.join(", ")
            ),
            Violation::StagnationExceeded { attempts } => format!(
                "Healing stagnated after {} attempts without progress",
                attempts
            ),
        }
    }

    /// Fatal categories short-circuit the loop with no healing attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Violation::UnknownReference { .. } | Violation::UnsupportedSchemaVersion { .. }
        )
    }

    pub fn is_healable(&self) -> bool {
        matches!(
            self,
            Violation::MissingBinding { .. } | Violation::SchemaCompatibility { .. }
        )
    }

    /// One report line, as surfaced in the aggregated failure.
    pub fn report_line(&self) -> String {
        format!("  {}: {}", self.category(), self.message())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message())
    }
}

/// Deterministic ordering for terminal failure sets.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by_key(|v| (v.category(), v.locator(), v.message()));
}

/// Topology-inferred role, derived purely from bound ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveRole {
    SourceLike,
    TransformerLike,
    SinkLike,
}

impl EffectiveRole {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveRole::SourceLike => "source-like",
            EffectiveRole::TransformerLike => "transformer-like",
            EffectiveRole::SinkLike => "sink-like",
        }
    }

    pub fn agrees_with(self, declared: Role) -> bool {
        matches!(
            (self, declared),
            (EffectiveRole::SourceLike, Role::Source)
                | (EffectiveRole::TransformerLike, Role::Transformer)
                | (EffectiveRole::SinkLike, Role::Sink)
        )
    }
}

/// Informational note: declared and effective role disagree.
///
/// Never a violation. Declared role is advisory metadata for the
/// synthesizer, so the healer is not asked to resolve the delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDelta {
    pub component: String,
    pub declared: Role,
    pub effective: EffectiveRole,
}

impl fmt::Display for RoleDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component {} declared {} but is {} by topology",
            self.component,
            self.declared,
            self.effective.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn schema_mismatch_message_is_verbatim() {
        let v = Violation::SchemaCompatibility {
            producer: "event_source".to_string(),
            producer_port: "output_main".to_string(),
            producer_schema: "common_object_schema".to_string(),
            consumer: "event_store".to_string(),
            consumer_port: "input_main".to_string(),
            consumer_schema: "ItemSchema".to_string(),
        };
        assert_eq!(
            v.message(),
            "Schema mismatch without transformation: event_source.output_main \
             (common_object_schema) → event_store.input_main (ItemSchema)"
        );
        assert_eq!(v.category(), "binding.schema_compatibility");
    }

    #[test]
    fn fatal_flags_match_taxonomy() {
        let unknown = Violation::UnknownReference {
            binding: "a.output_main → b.input_main".to_string(),
            reference: "component 'b'".to_string(),
        };
        let version = Violation::UnsupportedSchemaVersion {
            declared: "0.9.0".to_string(),
            supported: vec!["1.0.0".to_string()],
        };
        let missing = Violation::MissingBinding {
            component: "a".to_string(),
            port: "output_main".to_string(),
        };
        assert!(unknown.is_fatal() && !unknown.is_healable());
        assert!(version.is_fatal() && !version.is_healable());
        assert!(!missing.is_fatal() && missing.is_healable());
    }

    #[test]
    fn report_line_is_indented_category_message() {
        let v = Violation::MissingBinding {
            component: "sink".to_string(),
            port: "input_main".to_string(),
        };
        assert_eq!(
            v.report_line(),
            "  binding.missing: Required port sink.input_main is unbound"
        );
    }

    #[test]
    fn sort_is_deterministic() {
        let mut violations = vec![
            Violation::MissingBinding {
                component: "b".to_string(),
                port: "input_main".to_string(),
            },
            Violation::UnknownReference {
                binding: "x.output_main → y.input_main".to_string(),
                reference: "component 'y'".to_string(),
            },
            Violation::MissingBinding {
                component: "a".to_string(),
                port: "input_main".to_string(),
            },
        ];
        sort_violations(&mut violations);
        let categories: Vec<&str> = violations.iter().map(|v| v.category()).collect();
        assert_eq!(
            categories,
            vec![
                "binding.missing",
                "binding.missing",
                "structural.unknown_reference"
            ]
        );
        assert_eq!(violations[0].locator(), "a.input_main");
    }

    #[test]
    fn effective_role_agreement() {
        assert!(EffectiveRole::SinkLike.agrees_with(Role::Sink));
        assert!(!EffectiveRole::SinkLike.agrees_with(Role::Source));
        assert!(EffectiveRole::SourceLike.agrees_with(Role::Source));
    }
}
