//! Property-based progress-or-fail tests.
//!
//! For any small system the orchestrator must terminate within the attempt
//! budget: either `SUCCEEDED`, or `FAILED` via stagnation or exhaustion.
//! Successful resolutions must also be fixpoints: resolving the healed
//! blueprint again performs zero operations.

use flowfix_catalog::{PortTemplateCatalog, SchemaCatalog};
use flowfix_core::{ResolveSettings, resolve};
use flowfix_types::blueprint::{
    Binding, Blueprint, Component, ComponentKind, Endpoint, Port, PortDirection, System,
};
use indexmap::IndexMap;
use proptest::prelude::*;

const SCHEMAS: &[&str] = &[
    "any",
    "common_object_schema",
    "ItemSchema",
    "event_record_schema",
    "metric_sample_schema",
];

const KINDS: &[ComponentKind] = &[
    ComponentKind::Generator,
    ComponentKind::Processor,
    ComponentKind::Router,
    ComponentKind::Store,
    ComponentKind::Emitter,
];

/// (port slot, schema index, optional flag); slots map to the fixed
/// template-style names so prefixes always stay valid.
fn arb_port_spec() -> impl Strategy<Value = (usize, usize, bool)> {
    (0..3usize, 0..SCHEMAS.len(), any::<bool>())
}

fn arb_component_spec() -> impl Strategy<Value = (usize, Vec<(usize, usize, bool)>)> {
    (0..KINDS.len(), proptest::collection::vec(arb_port_spec(), 0..3))
}

fn build_component(index: usize, kind_idx: usize, port_specs: Vec<(usize, usize, bool)>) -> Component {
    let mut ports = IndexMap::new();
    for (slot, schema, optional) in port_specs {
        let (name, direction) = match slot {
            0 => ("input_main", PortDirection::In),
            1 => ("output_main", PortDirection::Out),
            _ => ("error_out", PortDirection::Out),
        };
        ports.insert(
            name.to_string(),
            Port {
                direction,
                schema: SCHEMAS[schema].to_string(),
                // Only error ports may be optional; required ports drive healing.
                optional: optional && name == "error_out",
                buffer: None,
            },
        );
    }
    Component {
        name: format!("component_{}", index),
        kind: KINDS[kind_idx],
        role: None,
        ports,
        config: serde_json::Value::Null,
    }
}

fn arb_blueprint() -> impl Strategy<Value = Blueprint> {
    (
        proptest::collection::vec(arb_component_spec(), 1..5),
        proptest::collection::vec((any::<usize>(), any::<usize>()), 0..3),
    )
        .prop_map(|(component_specs, edges)| {
            let components: Vec<Component> = component_specs
                .into_iter()
                .enumerate()
                .map(|(i, (kind, ports))| build_component(i, kind, ports))
                .collect();

            // Wire up random edges between whatever ports happen to exist;
            // dangling choices are simply skipped, so some systems start
            // with bindings and some start empty.
            let n = components.len();
            let mut bindings = Vec::new();
            for (from_pick, to_pick) in edges {
                let producer = &components[from_pick % n];
                let consumer = &components[to_pick % n];
                let Some((out_name, _)) = producer.output_ports().next() else {
                    continue;
                };
                let Some((in_name, _)) = consumer.input_ports().next() else {
                    continue;
                };
                bindings.push(Binding::compact(
                    Endpoint::new(producer.name.as_str(), out_name),
                    Endpoint::new(consumer.name.as_str(), in_name),
                ));
            }

            Blueprint {
                schema_version: Some("1.0.0".to_string()),
                system: System {
                    name: "generated".to_string(),
                    components,
                    bindings,
                },
                policy: None,
            }
        })
}

proptest! {
    /// The loop never runs past its bounds, whatever the input.
    #[test]
    fn resolution_terminates_within_the_attempt_budget(blueprint in arb_blueprint()) {
        let schemas = SchemaCatalog::builtin();
        let templates = PortTemplateCatalog::builtin();
        let settings = ResolveSettings::default();

        match resolve(blueprint, &schemas, &templates, &settings) {
            Ok(outcome) => prop_assert!(outcome.attempts <= settings.max_attempts),
            Err(err) => prop_assert!(err.attempts() <= settings.max_attempts),
        }
    }

    /// A successful resolution is a fixpoint: resolving the healed
    /// blueprint again performs zero operations and changes nothing.
    #[test]
    fn successful_resolutions_are_fixpoints(blueprint in arb_blueprint()) {
        let schemas = SchemaCatalog::builtin();
        let templates = PortTemplateCatalog::builtin();
        let settings = ResolveSettings::default();

        let Ok(outcome) = resolve(blueprint, &schemas, &templates, &settings) else {
            return Ok(());
        };

        let healed = outcome.blueprint.clone();
        let second = resolve(outcome.blueprint, &schemas, &templates, &settings)
            .expect("healed blueprint must stay valid");
        prop_assert_eq!(second.attempts, 1);
        prop_assert!(second.operations.is_empty());
        prop_assert_eq!(second.blueprint, healed);
    }
}
