//! Schema-mismatch transformation synthesis.
//!
//! Re-runs the schema checker against the current blueprint rather than
//! trusting the attempt's violation snapshot: binding inference runs
//! earlier in the same attempt, and bindings it just created must be
//! healed in this round, not discovered one attempt later.
//!
//! Precedence: when the consumer port's template default schema is the
//! universal `any`, the consumer's declared schema is relaxed back to
//! `any`; every other mismatch gets a named transformation. Relaxation
//! only ever targets the universal schema.

use super::{HealContext, Healer};
use crate::checks::check_schemas;
use flowfix_catalog::SchemaCatalog;
use flowfix_types::blueprint::{Binding, Blueprint, System};
use flowfix_types::ops::HealOp;
use flowfix_types::schema::ANY_SCHEMA;
use flowfix_types::violation::Violation;
use tracing::debug;

pub struct TransformationSynthesisHealer;

impl Healer for TransformationSynthesisHealer {
    fn id(&self) -> &'static str {
        "transformation_synthesis"
    }

    fn heal(&self, blueprint: &mut Blueprint, ctx: &HealContext<'_>) -> Vec<HealOp> {
        let mismatches = check_schemas(&blueprint.system, ctx.schemas);
        let mut ops = Vec::new();

        for violation in mismatches {
            let Violation::SchemaCompatibility {
                producer,
                producer_port,
                producer_schema,
                consumer,
                consumer_port,
                consumer_schema,
            } = violation
            else {
                continue;
            };

            let template_default = blueprint
                .system
                .component(&consumer)
                .map(|c| c.kind)
                .and_then(|kind| ctx.templates.default_schema(kind, &consumer_port));

            if template_default == Some(ANY_SCHEMA) {
                // An earlier relaxation in this pass may already have fixed
                // this port for another producer.
                let Some(port) = blueprint
                    .system
                    .component_mut(&consumer)
                    .and_then(|c| c.port_mut(&consumer_port))
                else {
                    continue;
                };
                if SchemaCatalog::is_universal(&port.schema) {
                    continue;
                }
                let previous = std::mem::replace(&mut port.schema, ANY_SCHEMA.to_string());
                debug!(consumer = %consumer, port = %consumer_port, "relaxed consumer schema");
                ops.push(HealOp::RelaxedConsumerSchema {
                    consumer,
                    consumer_port,
                    previous_schema: previous,
                });
                continue;
            }

            // An earlier attachment in this pass covers the whole binding,
            // so only bindings still lacking a transformation are eligible.
            let Some(binding) = find_binding_mut(
                &mut blueprint.system,
                (&producer, &producer_port),
                (&consumer, &consumer_port),
            ) else {
                continue;
            };
            let transformation = format!("convert_{}_to_{}", producer_schema, consumer_schema);
            binding.transformation = Some(transformation.clone());
            debug!(transformation = %transformation, "attached transformation");
            ops.push(HealOp::AttachedTransformation {
                producer,
                producer_port,
                consumer,
                consumer_port,
                transformation,
            });
        }

        ops
    }
}

fn find_binding_mut<'a>(
    system: &'a mut System,
    producer: (&str, &str),
    consumer: (&str, &str),
) -> Option<&'a mut Binding> {
    system.bindings.iter_mut().find(|b| {
        b.transformation.is_none()
            && b.from.component == producer.0
            && b.from.port == producer.1
            && b.to
                .iter()
                .any(|t| t.component == consumer.0 && t.port == consumer.1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowfix_catalog::PortTemplateCatalog;
    use flowfix_types::blueprint::{
        Component, ComponentKind, Endpoint, Port, PortDirection,
    };
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn component(
        name: &str,
        kind: ComponentKind,
        ports: Vec<(&str, PortDirection, &str)>,
    ) -> Component {
        Component {
            name: name.to_string(),
            kind,
            role: None,
            ports: ports
                .into_iter()
                .map(|(n, d, s)| {
                    (
                        n.to_string(),
                        Port {
                            direction: d,
                            schema: s.to_string(),
                            optional: false,
                            buffer: None,
                        },
                    )
                })
                .collect::<IndexMap<_, _>>(),
            config: serde_json::Value::Null,
        }
    }

    fn heal(blueprint: &mut Blueprint) -> Vec<HealOp> {
        let schemas = SchemaCatalog::builtin();
        let templates = PortTemplateCatalog::builtin();
        let ctx = HealContext {
            schemas: &schemas,
            templates: &templates,
            violations: &[],
        };
        TransformationSynthesisHealer.heal(blueprint, &ctx)
    }

    /// Producer and consumer with a custom (non-template) consumer port,
    /// so relaxation does not apply.
    fn custom_port_blueprint() -> Blueprint {
        Blueprint {
            schema_version: Some("1.0.0".to_string()),
            system: System {
                name: "s".to_string(),
                components: vec![
                    component(
                        "event_source",
                        ComponentKind::Generator,
                        vec![("output_main", PortDirection::Out, "common_object_schema")],
                    ),
                    component(
                        "event_store",
                        ComponentKind::Store,
                        vec![("input_items", PortDirection::In, "ItemSchema")],
                    ),
                ],
                bindings: vec![Binding::compact(
                    Endpoint::new("event_source", "output_main"),
                    Endpoint::new("event_store", "input_items"),
                )],
            },
            policy: None,
        }
    }

    #[test]
    fn attaches_named_transformation_for_custom_ports() {
        let mut bp = custom_port_blueprint();
        let ops = heal(&mut bp);
        assert_eq!(ops.len(), 1);
        assert_eq!(
            bp.system.bindings[0].transformation.as_deref(),
            Some("convert_common_object_schema_to_ItemSchema")
        );
    }

    #[test]
    fn relaxes_template_ports_to_any_instead() {
        let mut bp = custom_port_blueprint();
        // Rename the consumer port to the store template's input_main.
        let store = bp.system.component_mut("event_store").unwrap();
        let port = store.ports.shift_remove("input_items").unwrap();
        store.ports.insert("input_main".to_string(), port);
        bp.system.bindings[0].to[0] = Endpoint::new("event_store", "input_main");

        let ops = heal(&mut bp);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], HealOp::RelaxedConsumerSchema { .. }));
        assert!(bp.system.bindings[0].transformation.is_none());
        assert_eq!(
            bp.system
                .component("event_store")
                .unwrap()
                .port("input_main")
                .unwrap()
                .schema,
            "any"
        );
    }

    #[test]
    fn is_idempotent() {
        let mut bp = custom_port_blueprint();
        assert_eq!(heal(&mut bp).len(), 1);
        assert!(heal(&mut bp).is_empty());
    }

    #[test]
    fn existing_transformation_is_left_alone() {
        let mut bp = custom_port_blueprint();
        bp.system.bindings[0].transformation = Some("custom_coercion".to_string());
        let ops = heal(&mut bp);
        assert!(ops.is_empty());
        assert_eq!(
            bp.system.bindings[0].transformation.as_deref(),
            Some("custom_coercion")
        );
    }
}
