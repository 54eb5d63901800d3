//! The schema & type catalog: named data schemas and the assignability
//! relation between them.
//!
//! The relation is partial and directed. It is reflexive, and the
//! universal schema `any` is assignable to and from everything. Names the
//! catalog has never seen are tolerated as opaque distinct types rather
//! than rejected; the compatibility checker treats a mismatch involving
//! them like any other, so a typo'd schema surfaces as a healable
//! schema-compatibility violation instead of a parse failure.

use flowfix_types::schema::ANY_SCHEMA;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: BTreeSet<String>,
    /// Directed (from, to) assignability pairs beyond reflexivity and `any`.
    assignable: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the engine: the universal schema plus the
    /// generic object/event/metric families the upstream translator emits.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register_schema(ANY_SCHEMA);
        for name in [
            "common_object_schema",
            "ItemSchema",
            "event_record_schema",
            "metric_sample_schema",
        ] {
            catalog.register_schema(name);
        }
        // Event records carry a superset of the metric sample fields.
        catalog.register_assignable("event_record_schema", "metric_sample_schema");
        catalog
    }

    pub fn register_schema(&mut self, name: impl Into<String>) {
        self.schemas.insert(name.into());
    }

    /// Declare that `from` may flow into a port expecting `to`.
    pub fn register_assignable(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        self.schemas.insert(from.clone());
        self.schemas.insert(to.clone());
        self.assignable.entry(from).or_default().insert(to);
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.schemas.contains(name)
    }

    pub fn is_universal(name: &str) -> bool {
        name == ANY_SCHEMA
    }

    /// Whether a value of schema `from` may flow into a port expecting `to`.
    pub fn assignable(&self, from: &str, to: &str) -> bool {
        if from == to || Self::is_universal(from) || Self::is_universal(to) {
            return true;
        }
        self.assignable
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }
}
