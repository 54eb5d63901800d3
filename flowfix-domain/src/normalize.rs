//! Pre-loop normalization.
//!
//! Runs exactly once per resolution, before the first validation round:
//! a missing `schema_version` is defaulted (the only heal outside the
//! iterative set), and components that declare no ports receive their
//! kind's template defaults. Neither step is retried.

use flowfix_catalog::PortTemplateCatalog;
use flowfix_types::blueprint::Blueprint;
use flowfix_types::ops::HealOp;
use tracing::debug;

pub fn normalize(
    blueprint: &mut Blueprint,
    templates: &PortTemplateCatalog,
    default_version: &str,
) -> Vec<HealOp> {
    let mut ops = Vec::new();

    if blueprint.schema_version.is_none() {
        blueprint.schema_version = Some(default_version.to_string());
        ops.push(HealOp::DefaultedSchemaVersion {
            version: default_version.to_string(),
        });
    }

    for component in &mut blueprint.system.components {
        if !component.ports.is_empty() {
            continue;
        }
        for template in templates.defaults_for(component.kind) {
            component
                .ports
                .insert(template.name.to_string(), template.instantiate());
        }
        debug!(
            component = %component.name,
            kind = %component.kind,
            "applied template ports"
        );
    }

    ops
}
