//! The in-memory blueprint model mutated by healing passes.
//!
//! Surface (YAML/JSON) concerns live in [`crate::wire`]; this module is the
//! shape the validator and healers work against. Components and ports keep
//! their declaration order, because binding inference pairs ports by that
//! order. Lookup is by name through the owning collection; a `Port` never
//! holds a back-reference to its component.

use indexmap::IndexMap;
use std::fmt;

/// Root document under resolution.
///
/// Constructed once per generation request, mutated in place across healing
/// rounds, and immutable the moment resolution succeeds or gives up.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Declared schema version. `None` when the document omitted it; the
    /// orchestrator defaults it before the first validation round.
    pub schema_version: Option<String>,
    pub system: System,
    pub policy: Option<Policy>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub name: String,
    /// Declaration order is semantic: healing pairs unbound ports first-to-first.
    pub components: Vec<Component>,
    pub bindings: Vec<Binding>,
}

impl System {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.name == name)
    }
}

/// Closed component-type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Generator,
    Processor,
    Router,
    Store,
    Emitter,
}

impl ComponentKind {
    pub const ALL: &'static [ComponentKind] = &[
        ComponentKind::Generator,
        ComponentKind::Processor,
        ComponentKind::Router,
        ComponentKind::Store,
        ComponentKind::Emitter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Generator => "generator",
            ComponentKind::Processor => "processor",
            ComponentKind::Router => "router",
            ComponentKind::Store => "store",
            ComponentKind::Emitter => "emitter",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared role. Advisory metadata for the synthesizer; the validator
/// infers an effective role from topology and only notes disagreements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Transformer,
    Sink,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Transformer => "transformer",
            Role::Sink => "sink",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Unique within the system.
    pub name: String,
    pub kind: ComponentKind,
    pub role: Option<Role>,
    /// Port name → port, in declaration order.
    pub ports: IndexMap<String, Port>,
    /// Free-form configuration, opaque to this engine.
    pub config: serde_json::Value,
}

impl Component {
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    pub fn port_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.get_mut(name)
    }

    /// Input ports in declaration order.
    pub fn input_ports(&self) -> impl Iterator<Item = (&str, &Port)> {
        self.ports
            .iter()
            .filter(|(_, p)| p.direction == PortDirection::In)
            .map(|(n, p)| (n.as_str(), p))
    }

    /// Output ports in declaration order.
    pub fn output_ports(&self) -> impl Iterator<Item = (&str, &Port)> {
        self.ports
            .iter()
            .filter(|(_, p)| p.direction == PortDirection::Out)
            .map(|(n, p)| (n.as_str(), p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    In,
    Out,
}

impl PortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            PortDirection::In => "in",
            PortDirection::Out => "out",
        }
    }
}

/// Port names must start with a role-indicating prefix.
pub const PORT_NAME_PREFIXES: &[&str] = &["input", "output", "error"];

pub fn port_name_has_role_prefix(name: &str) -> bool {
    PORT_NAME_PREFIXES.iter().any(|p| name.starts_with(p))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub direction: PortDirection,
    /// Schema reference, resolved against the schema catalog.
    pub schema: String,
    /// An unbound optional port is not a violation.
    pub optional: bool,
    /// Buffer/overflow configuration, consumed by the runtime; this engine
    /// only preserves it.
    pub buffer: Option<serde_json::Value>,
}

/// One end of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub component: String,
    pub port: String,
}

impl Endpoint {
    pub fn new(component: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.port)
    }
}

/// Which surface form a binding used in the source document.
///
/// Both forms normalize to the same internal shape; the tag exists so a
/// document that never needed healing round-trips byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingShape {
    /// `to:` was a single endpoint map.
    Compact,
    /// `to:` was a list of endpoints.
    Expanded,
}

/// A data-flow edge from one producer port to one or more consumer ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub from: Endpoint,
    pub to: Vec<Endpoint>,
    /// Deterministic identifier of a coercion the downstream synthesizer
    /// must implement. Taken on faith by the compatibility checker.
    pub transformation: Option<String>,
    pub shape: BindingShape,
}

impl Binding {
    /// A synthesized single-target binding. Healing always emits the
    /// compact surface form.
    pub fn compact(from: Endpoint, to: Endpoint) -> Self {
        Self {
            from,
            to: vec![to],
            transformation: None,
            shape: BindingShape::Compact,
        }
    }
}

/// Default-applicable runtime policy. Absence is healed by inserting the
/// canonical default; contents are never inferred from the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub retry: RetryPolicy,
    pub resources: ResourcePolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            resources: ResourcePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePolicy {
    pub max_memory_mb: u64,
    pub max_queue_depth: u64,
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        Self {
            max_memory_mb: 256,
            max_queue_depth: 1024,
        }
    }
}
