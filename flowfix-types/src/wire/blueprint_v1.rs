//! Wire form of the blueprint document (schema-exact).
//!
//! The one piece of real machinery here is `TargetsV1`: a binding's `to:`
//! accepts either a single endpoint map (compact form) or a list of
//! endpoints (expanded form). Reading normalizes both to the internal list;
//! writing restores the compact form when the internal shape tag says the
//! document used it and the target list is still a single entry.

use super::WireError;
use crate::blueprint::{
    Binding, BindingShape, Blueprint, Component, ComponentKind, Endpoint, Policy, Port,
    PortDirection, ResourcePolicy, RetryPolicy, Role, System, port_name_has_role_prefix,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    pub system: SystemV1,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemV1 {
    pub name: String,

    #[serde(default)]
    pub components: Vec<ComponentV1>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<BindingV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentV1 {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ComponentKindV1,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleV1>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub ports: IndexMap<String, PortV1>,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKindV1 {
    Generator,
    Processor,
    Router,
    Store,
    Emitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleV1 {
    Source,
    Transformer,
    Sink,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortV1 {
    pub direction: DirectionV1,

    pub schema: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionV1 {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointV1 {
    pub component: String,
    pub port: String,
}

/// Both surface shapes of a binding's target set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetsV1 {
    Single(EndpointV1),
    Many(Vec<EndpointV1>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingV1 {
    pub from: EndpointV1,

    pub to: TargetsV1,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyV1 {
    #[serde(default)]
    pub retry: RetryPolicyV1,

    #[serde(default)]
    pub resources: ResourcePolicyV1,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicyV1 {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicyV1 {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            max_attempts: p.max_attempts,
            backoff_ms: p.backoff_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePolicyV1 {
    pub max_memory_mb: u64,
    pub max_queue_depth: u64,
}

impl Default for ResourcePolicyV1 {
    fn default() -> Self {
        let p = ResourcePolicy::default();
        Self {
            max_memory_mb: p.max_memory_mb,
            max_queue_depth: p.max_queue_depth,
        }
    }
}

// ── wire → internal ──────────────────────────────────────────────────────

impl From<ComponentKindV1> for ComponentKind {
    fn from(k: ComponentKindV1) -> Self {
        match k {
            ComponentKindV1::Generator => ComponentKind::Generator,
            ComponentKindV1::Processor => ComponentKind::Processor,
            ComponentKindV1::Router => ComponentKind::Router,
            ComponentKindV1::Store => ComponentKind::Store,
            ComponentKindV1::Emitter => ComponentKind::Emitter,
        }
    }
}

impl From<RoleV1> for Role {
    fn from(r: RoleV1) -> Self {
        match r {
            RoleV1::Source => Role::Source,
            RoleV1::Transformer => Role::Transformer,
            RoleV1::Sink => Role::Sink,
        }
    }
}

impl From<DirectionV1> for PortDirection {
    fn from(d: DirectionV1) -> Self {
        match d {
            DirectionV1::In => PortDirection::In,
            DirectionV1::Out => PortDirection::Out,
        }
    }
}

impl From<EndpointV1> for Endpoint {
    fn from(e: EndpointV1) -> Self {
        Endpoint {
            component: e.component,
            port: e.port,
        }
    }
}

impl TryFrom<BlueprintV1> for Blueprint {
    type Error = WireError;

    fn try_from(wire: BlueprintV1) -> Result<Self, WireError> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::with_capacity(wire.system.components.len());
        for c in wire.system.components {
            if !seen.insert(c.name.clone()) {
                return Err(WireError::DuplicateComponent { name: c.name });
            }

            let mut ports = IndexMap::with_capacity(c.ports.len());
            for (name, p) in c.ports {
                if !port_name_has_role_prefix(&name) {
                    return Err(WireError::InvalidPortName {
                        component: c.name,
                        port: name,
                    });
                }
                ports.insert(
                    name,
                    Port {
                        direction: p.direction.into(),
                        schema: p.schema,
                        optional: p.optional,
                        buffer: p.buffer,
                    },
                );
            }

            components.push(Component {
                name: c.name,
                kind: c.kind.into(),
                role: c.role.map(Role::from),
                ports,
                config: c.config,
            });
        }

        let mut bindings = Vec::with_capacity(wire.system.bindings.len());
        for b in wire.system.bindings {
            let from: Endpoint = b.from.into();
            let (to, shape) = match b.to {
                TargetsV1::Single(e) => (vec![Endpoint::from(e)], BindingShape::Compact),
                TargetsV1::Many(targets) => {
                    if targets.is_empty() {
                        return Err(WireError::EmptyBindingTargets {
                            from: from.to_string(),
                        });
                    }
                    (
                        targets.into_iter().map(Endpoint::from).collect(),
                        BindingShape::Expanded,
                    )
                }
            };
            bindings.push(Binding {
                from,
                to,
                transformation: b.transformation,
                shape,
            });
        }

        Ok(Blueprint {
            schema_version: wire.schema_version,
            system: System {
                name: wire.system.name,
                components,
                bindings,
            },
            policy: wire.policy.map(|p| Policy {
                retry: RetryPolicy {
                    max_attempts: p.retry.max_attempts,
                    backoff_ms: p.retry.backoff_ms,
                },
                resources: ResourcePolicy {
                    max_memory_mb: p.resources.max_memory_mb,
                    max_queue_depth: p.resources.max_queue_depth,
                },
            }),
        })
    }
}

// ── internal → wire ──────────────────────────────────────────────────────

impl From<ComponentKind> for ComponentKindV1 {
    fn from(k: ComponentKind) -> Self {
        match k {
            ComponentKind::Generator => ComponentKindV1::Generator,
            ComponentKind::Processor => ComponentKindV1::Processor,
            ComponentKind::Router => ComponentKindV1::Router,
            ComponentKind::Store => ComponentKindV1::Store,
            ComponentKind::Emitter => ComponentKindV1::Emitter,
        }
    }
}

impl From<Role> for RoleV1 {
    fn from(r: Role) -> Self {
        match r {
            Role::Source => RoleV1::Source,
            Role::Transformer => RoleV1::Transformer,
            Role::Sink => RoleV1::Sink,
        }
    }
}

impl From<PortDirection> for DirectionV1 {
    fn from(d: PortDirection) -> Self {
        match d {
            PortDirection::In => DirectionV1::In,
            PortDirection::Out => DirectionV1::Out,
        }
    }
}

impl From<&Endpoint> for EndpointV1 {
    fn from(e: &Endpoint) -> Self {
        EndpointV1 {
            component: e.component.clone(),
            port: e.port.clone(),
        }
    }
}

impl From<&Binding> for BindingV1 {
    fn from(b: &Binding) -> Self {
        let to = if b.shape == BindingShape::Compact && b.to.len() == 1 {
            TargetsV1::Single(EndpointV1::from(&b.to[0]))
        } else {
            TargetsV1::Many(b.to.iter().map(EndpointV1::from).collect())
        };
        BindingV1 {
            from: EndpointV1::from(&b.from),
            to,
            transformation: b.transformation.clone(),
        }
    }
}

impl From<&Blueprint> for BlueprintV1 {
    fn from(bp: &Blueprint) -> Self {
        BlueprintV1 {
            schema_version: bp.schema_version.clone(),
            system: SystemV1 {
                name: bp.system.name.clone(),
                components: bp
                    .system
                    .components
                    .iter()
                    .map(|c| ComponentV1 {
                        name: c.name.clone(),
                        kind: c.kind.into(),
                        role: c.role.map(RoleV1::from),
                        ports: c
                            .ports
                            .iter()
                            .map(|(n, p)| {
                                (
                                    n.clone(),
                                    PortV1 {
                                        direction: p.direction.into(),
                                        schema: p.schema.clone(),
                                        optional: p.optional,
                                        buffer: p.buffer.clone(),
                                    },
                                )
                            })
                            .collect(),
                        config: c.config.clone(),
                    })
                    .collect(),
                bindings: bp.system.bindings.iter().map(BindingV1::from).collect(),
            },
            policy: bp.policy.as_ref().map(|p| PolicyV1 {
                retry: RetryPolicyV1 {
                    max_attempts: p.retry.max_attempts,
                    backoff_ms: p.retry.backoff_ms,
                },
                resources: ResourcePolicyV1 {
                    max_memory_mb: p.resources.max_memory_mb,
                    max_queue_depth: p.resources.max_queue_depth,
                },
            }),
        }
    }
}
