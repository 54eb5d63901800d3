//! Referential integrity, unbound-port, and role checks.
//!
//! Check order matters for diagnostics: unknown references first (they are
//! fatal and exclude the endpoint from bound-port bookkeeping), then
//! unbound required ports, then role inference. Role disagreements are
//! informational only; collapsing them into hard violations would change
//! observable diagnostics for documents that validate today.

use crate::index::{EndpointResolution, SystemIndex, resolve};
use flowfix_types::blueprint::{Component, Endpoint, System};
use flowfix_types::violation::{EffectiveRole, RoleDelta, Violation};
use tracing::info;

/// Outcome of the structural pass: hard violations plus soft role notes.
#[derive(Debug, Default)]
pub struct StructuralReport {
    pub violations: Vec<Violation>,
    pub role_deltas: Vec<RoleDelta>,
}

pub fn check_structure(system: &System) -> StructuralReport {
    let index = SystemIndex::build(system);
    let mut report = StructuralReport::default();

    check_references(system, &mut report.violations);
    check_unbound_ports(system, &index, &mut report.violations);
    infer_roles(system, &index, &mut report.role_deltas);

    report
}

fn check_references(system: &System, violations: &mut Vec<Violation>) {
    for binding in &system.bindings {
        if let Some(reference) = describe_unresolved(system, &binding.from) {
            // The wire layer rejects empty target lists, so a
            // representative target always exists.
            let representative = binding
                .to
                .first()
                .map(|t| edge_string(&binding.from, t))
                .unwrap_or_else(|| binding.from.to_string());
            violations.push(Violation::UnknownReference {
                binding: representative,
                reference,
            });
        }
        for target in &binding.to {
            if let Some(reference) = describe_unresolved(system, target) {
                violations.push(Violation::UnknownReference {
                    binding: edge_string(&binding.from, target),
                    reference,
                });
            }
        }
    }
}

fn describe_unresolved(system: &System, endpoint: &Endpoint) -> Option<String> {
    match resolve(system, endpoint) {
        EndpointResolution::Ok => None,
        EndpointResolution::UnknownComponent => {
            Some(format!("component '{}'", endpoint.component))
        }
        EndpointResolution::UnknownPort => Some(format!(
            "port '{}' on component '{}'",
            endpoint.port, endpoint.component
        )),
    }
}

fn edge_string(from: &Endpoint, to: &Endpoint) -> String {
    format!("{} → {}", from, to)
}

fn check_unbound_ports(system: &System, index: &SystemIndex, violations: &mut Vec<Violation>) {
    for component in &system.components {
        for (name, port) in &component.ports {
            if port.optional {
                continue;
            }
            if !index.is_bound(&component.name, name, port.direction) {
                violations.push(Violation::MissingBinding {
                    component: component.name.clone(),
                    port: name.clone(),
                });
            }
        }
    }
}

fn infer_roles(system: &System, index: &SystemIndex, deltas: &mut Vec<RoleDelta>) {
    for component in &system.components {
        let Some(effective) = effective_role(component, index) else {
            continue;
        };
        let Some(declared) = component.role else {
            continue;
        };
        if effective.agrees_with(declared) {
            continue;
        }
        let delta = RoleDelta {
            component: component.name.clone(),
            declared,
            effective,
        };
        info!(role_delta = %delta, "declared role disagrees with topology");
        deltas.push(delta);
    }
}

/// R1: effective role derived purely from topology.
pub fn effective_role(component: &Component, index: &SystemIndex) -> Option<EffectiveRole> {
    let bound_outputs = index.bound_output_count(component);
    let input_ports = component.input_ports().count();
    let output_ports = component.output_ports().count();

    if bound_outputs > 0 {
        if input_ports == 0 {
            return Some(EffectiveRole::SourceLike);
        }
        return Some(EffectiveRole::TransformerLike);
    }
    if index.bound_input_count(component) > 0 && output_ports == 0 {
        return Some(EffectiveRole::SinkLike);
    }
    None
}
