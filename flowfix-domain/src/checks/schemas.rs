//! Schema compatibility over every binding edge.
//!
//! A standalone pass rather than a method on the validator: the
//! transformation-synthesis healer re-runs it mid-attempt against the
//! current binding list, so bindings inferred moments earlier are checked
//! in the same round they were created.

use flowfix_catalog::SchemaCatalog;
use flowfix_types::blueprint::System;
use flowfix_types::violation::Violation;

pub fn check_schemas(system: &System, catalog: &SchemaCatalog) -> Vec<Violation> {
    let mut violations = Vec::new();

    for binding in &system.bindings {
        // Unresolvable endpoints are the structural checker's problem.
        let Some(producer) = system.component(&binding.from.component) else {
            continue;
        };
        let Some(producer_port) = producer.port(&binding.from.port) else {
            continue;
        };

        for target in &binding.to {
            let Some(consumer) = system.component(&target.component) else {
                continue;
            };
            let Some(consumer_port) = consumer.port(&target.port) else {
                continue;
            };

            if catalog.assignable(&producer_port.schema, &consumer_port.schema) {
                continue;
            }
            // A named transformation is taken on faith.
            if binding.transformation.is_some() {
                continue;
            }

            violations.push(Violation::SchemaCompatibility {
                producer: binding.from.component.clone(),
                producer_port: binding.from.port.clone(),
                producer_schema: producer_port.schema.clone(),
                consumer: target.component.clone(),
                consumer_port: target.port.clone(),
                consumer_schema: consumer_port.schema.clone(),
            });
        }
    }

    violations
}
