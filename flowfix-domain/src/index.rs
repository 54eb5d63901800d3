//! Name→index lookups and bound-port sets for one validation pass.
//!
//! Rebuilt from the system each time it is needed; healing mutates the
//! component and binding lists, so a cached index would go stale within a
//! single attempt. Ports never hold back-references to their components;
//! all resolution goes through this structure.

use flowfix_types::blueprint::{Component, Endpoint, PortDirection, System};
use std::collections::{BTreeMap, BTreeSet};

/// What an endpoint lookup found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointResolution {
    Ok,
    UnknownComponent,
    UnknownPort,
}

#[derive(Debug, Clone)]
pub struct SystemIndex {
    by_name: BTreeMap<String, usize>,
    /// `(component, port)` pairs appearing as a resolvable binding source.
    bound_outputs: BTreeSet<(String, String)>,
    /// `(component, port)` pairs appearing as a resolvable binding target.
    bound_inputs: BTreeSet<(String, String)>,
}

impl SystemIndex {
    pub fn build(system: &System) -> Self {
        let by_name: BTreeMap<String, usize> = system
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        let mut bound_outputs = BTreeSet::new();
        let mut bound_inputs = BTreeSet::new();
        for binding in &system.bindings {
            // Unresolvable endpoints are referential-integrity violations;
            // they must not mark anything as bound. A binding only counts
            // as direction-appropriate for the port it attaches to.
            if let Some(port) = port_of(system, &binding.from)
                && port.direction == PortDirection::Out
            {
                bound_outputs.insert((binding.from.component.clone(), binding.from.port.clone()));
            }
            for target in &binding.to {
                if let Some(port) = port_of(system, target)
                    && port.direction == PortDirection::In
                {
                    bound_inputs.insert((target.component.clone(), target.port.clone()));
                }
            }
        }

        Self {
            by_name,
            bound_outputs,
            bound_inputs,
        }
    }

    pub fn component_idx(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn is_bound(&self, component: &str, port: &str, direction: PortDirection) -> bool {
        let key = (component.to_string(), port.to_string());
        match direction {
            PortDirection::Out => self.bound_outputs.contains(&key),
            PortDirection::In => self.bound_inputs.contains(&key),
        }
    }

    /// Bound output ports of one component, by the component's port order.
    pub fn bound_output_count(&self, component: &Component) -> usize {
        component
            .output_ports()
            .filter(|(name, _)| self.is_bound(&component.name, name, PortDirection::Out))
            .count()
    }

    pub fn bound_input_count(&self, component: &Component) -> usize {
        component
            .input_ports()
            .filter(|(name, _)| self.is_bound(&component.name, name, PortDirection::In))
            .count()
    }
}

fn port_of<'a>(
    system: &'a System,
    endpoint: &Endpoint,
) -> Option<&'a flowfix_types::blueprint::Port> {
    system
        .component(&endpoint.component)
        .and_then(|c| c.port(&endpoint.port))
}

/// Resolve an endpoint against the system, reporting what is missing.
pub fn resolve(system: &System, endpoint: &Endpoint) -> EndpointResolution {
    match system.component(&endpoint.component) {
        None => EndpointResolution::UnknownComponent,
        Some(component) => {
            if component.port(&endpoint.port).is_some() {
                EndpointResolution::Ok
            } else {
                EndpointResolution::UnknownPort
            }
        }
    }
}
