//! Policy defaulting.
//!
//! Inserts the canonical default policy block when a blueprint has none.
//! Contents are never inferred from the system; a present-but-partial
//! policy is the upstream translator's responsibility.

use super::{HealContext, Healer};
use flowfix_types::blueprint::{Blueprint, Policy};
use flowfix_types::ops::HealOp;
use tracing::debug;

pub struct PolicyDefaultsHealer;

impl Healer for PolicyDefaultsHealer {
    fn id(&self) -> &'static str {
        "policy_defaults"
    }

    fn heal(&self, blueprint: &mut Blueprint, _ctx: &HealContext<'_>) -> Vec<HealOp> {
        if blueprint.policy.is_some() {
            return vec![];
        }
        blueprint.policy = Some(Policy::default());
        debug!("inserted default policy block");
        vec![HealOp::AddedPolicyDefaults]
    }
}
