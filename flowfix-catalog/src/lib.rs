//! Read-only registries consumed by the resolution engine.
//!
//! Both catalogs are built before the first resolution and never mutated
//! afterward; concurrent resolutions of different blueprints share them by
//! immutable reference.

mod schemas;
mod templates;

pub use schemas::SchemaCatalog;
pub use templates::{PortTemplate, PortTemplateCatalog};
