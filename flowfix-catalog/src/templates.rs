//! The port template catalog: default port shapes per component kind.
//!
//! Consumed once during normalization, before the first validation round:
//! a component that declares no ports receives its kind's defaults. The
//! catalog also answers what a port's template default schema is, which
//! drives the relax-to-`any` precedence during transformation synthesis.

use flowfix_types::blueprint::{ComponentKind, Port, PortDirection};
use flowfix_types::schema::ANY_SCHEMA;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct PortTemplate {
    pub name: &'static str,
    pub direction: PortDirection,
    pub schema: &'static str,
    pub optional: bool,
}

impl PortTemplate {
    const fn required(name: &'static str, direction: PortDirection, schema: &'static str) -> Self {
        Self {
            name,
            direction,
            schema,
            optional: false,
        }
    }

    const fn optional(name: &'static str, direction: PortDirection, schema: &'static str) -> Self {
        Self {
            name,
            direction,
            schema,
            optional: true,
        }
    }

    pub fn instantiate(&self) -> Port {
        Port {
            direction: self.direction,
            schema: self.schema.to_string(),
            optional: self.optional,
            buffer: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortTemplateCatalog {
    templates: BTreeMap<ComponentKind, Vec<PortTemplate>>,
}

impl PortTemplateCatalog {
    /// Templates for the fixed component vocabulary. Error ports are
    /// optional: a component without a bound error sink is not broken.
    pub fn builtin() -> Self {
        use PortDirection::{In, Out};
        let mut templates = BTreeMap::new();
        templates.insert(
            ComponentKind::Generator,
            vec![PortTemplate::required("output_main", Out, ANY_SCHEMA)],
        );
        templates.insert(
            ComponentKind::Processor,
            vec![
                PortTemplate::required("input_main", In, ANY_SCHEMA),
                PortTemplate::required("output_main", Out, ANY_SCHEMA),
            ],
        );
        templates.insert(
            ComponentKind::Router,
            vec![
                PortTemplate::required("input_main", In, ANY_SCHEMA),
                PortTemplate::required("output_main", Out, ANY_SCHEMA),
                PortTemplate::optional("error_out", Out, ANY_SCHEMA),
            ],
        );
        templates.insert(
            ComponentKind::Store,
            vec![PortTemplate::required("input_main", In, ANY_SCHEMA)],
        );
        templates.insert(
            ComponentKind::Emitter,
            vec![PortTemplate::required("input_main", In, ANY_SCHEMA)],
        );
        Self { templates }
    }

    pub fn defaults_for(&self, kind: ComponentKind) -> &[PortTemplate] {
        self.templates.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The template default schema for a (kind, port) pair, when one exists.
    pub fn default_schema(&self, kind: ComponentKind, port: &str) -> Option<&'static str> {
        self.defaults_for(kind)
            .iter()
            .find(|t| t.name == port)
            .map(|t| t.schema)
    }
}
