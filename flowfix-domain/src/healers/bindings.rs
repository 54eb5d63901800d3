//! Missing-binding inference.
//!
//! Pairs unbound output ports with unbound input ports by declaration
//! order within the system: first unbound producer to the first unbound
//! consumer whose schema is assignable, falling back to the first unbound
//! consumer outright (any pair is coercible once transformation synthesis
//! runs later in the same attempt). Optional ports and self-edges never
//! participate. One compact binding is synthesized per pair.

use super::{HealContext, Healer};
use crate::index::SystemIndex;
use flowfix_types::blueprint::{Binding, Blueprint, Endpoint, PortDirection};
use flowfix_types::ops::HealOp;
use tracing::debug;

pub struct BindingInferenceHealer;

#[derive(Debug, Clone)]
struct UnboundPort {
    component: String,
    port: String,
    schema: String,
}

impl BindingInferenceHealer {
    fn unbound_ports(blueprint: &Blueprint, direction: PortDirection) -> Vec<UnboundPort> {
        let index = SystemIndex::build(&blueprint.system);
        let mut out = Vec::new();
        for component in &blueprint.system.components {
            for (name, port) in &component.ports {
                if port.direction != direction || port.optional {
                    continue;
                }
                if index.is_bound(&component.name, name, direction) {
                    continue;
                }
                out.push(UnboundPort {
                    component: component.name.clone(),
                    port: name.clone(),
                    schema: port.schema.clone(),
                });
            }
        }
        out
    }
}

impl Healer for BindingInferenceHealer {
    fn id(&self) -> &'static str {
        "binding_inference"
    }

    fn heal(&self, blueprint: &mut Blueprint, ctx: &HealContext<'_>) -> Vec<HealOp> {
        let producers = Self::unbound_ports(blueprint, PortDirection::Out);
        let mut consumers = Self::unbound_ports(blueprint, PortDirection::In);
        if producers.is_empty() || consumers.is_empty() {
            return vec![];
        }

        let mut ops = Vec::new();
        for producer in producers {
            let eligible = |c: &UnboundPort| c.component != producer.component;
            let chosen = consumers
                .iter()
                .position(|c| eligible(c) && ctx.schemas.assignable(&producer.schema, &c.schema))
                .or_else(|| consumers.iter().position(eligible));
            let Some(idx) = chosen else {
                continue;
            };
            let consumer = consumers.remove(idx);

            debug!(
                producer = %producer.component,
                consumer = %consumer.component,
                "inferred binding"
            );
            blueprint.system.bindings.push(Binding::compact(
                Endpoint::new(&producer.component, &producer.port),
                Endpoint::new(&consumer.component, &consumer.port),
            ));
            ops.push(HealOp::GeneratedBinding {
                producer: producer.component,
                producer_port: producer.port,
                consumer: consumer.component,
                consumer_port: consumer.port,
            });
        }
        ops
    }
}
