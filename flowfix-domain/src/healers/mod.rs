//! The healing transform library.
//!
//! Each healer is an idempotent repair for one healable violation
//! category: re-applying it to an already-healed document performs zero
//! operations. The orchestrator runs `builtin_healers()` once per attempt,
//! in registry order; the order is load-bearing (transformation synthesis
//! must see bindings that inference created earlier in the same attempt).

use flowfix_catalog::{PortTemplateCatalog, SchemaCatalog};
use flowfix_types::blueprint::Blueprint;
use flowfix_types::ops::HealOp;
use flowfix_types::violation::Violation;

mod bindings;
mod policy;
mod transforms;

pub use bindings::BindingInferenceHealer;
pub use policy::PolicyDefaultsHealer;
pub use transforms::TransformationSynthesisHealer;

/// Read-only context shared by all healers in one attempt.
pub struct HealContext<'a> {
    pub schemas: &'a SchemaCatalog,
    pub templates: &'a PortTemplateCatalog,
    /// The violations the attempt's validation produced. Healers that can
    /// be invalidated by earlier healers in the same attempt must re-scan
    /// the blueprint instead of trusting this snapshot.
    pub violations: &'a [Violation],
}

pub trait Healer {
    fn id(&self) -> &'static str;

    fn heal(&self, blueprint: &mut Blueprint, ctx: &HealContext<'_>) -> Vec<HealOp>;
}

/// The full library, in application order.
pub fn builtin_healers() -> Vec<Box<dyn Healer>> {
    vec![
        Box::new(BindingInferenceHealer),
        Box::new(TransformationSynthesisHealer),
        Box::new(PolicyDefaultsHealer),
    ]
}
