//! Static registries behind `flowfix explain` and `flowfix list-heals`.

use flowfix_types::violation::categories;

/// One violation category: how it is classified and what to do about it.
pub struct CategoryInfo {
    pub category: &'static str,
    pub healable: bool,
    pub description: &'static str,
    pub remediation: &'static str,
}

pub const CATEGORY_REGISTRY: &[CategoryInfo] = &[
    CategoryInfo {
        category: categories::UNKNOWN_REFERENCE,
        healable: false,
        description: "A binding endpoint names a component or port that does not exist. \
                      This indicates a malformed document from the upstream translator, \
                      so healing is never attempted.",
        remediation: "Fix the component or port name in the binding, or add the missing \
                      component to the system.",
    },
    CategoryInfo {
        category: categories::MISSING_BINDING,
        healable: true,
        description: "A non-optional port has no direction-appropriate binding.",
        remediation: "Usually healed automatically: unbound producers are paired with \
                      unbound consumers in declaration order. Mark the port `optional: true` \
                      if it is legitimately unconnected.",
    },
    CategoryInfo {
        category: categories::SCHEMA_COMPATIBILITY,
        healable: true,
        description: "A binding's producer and consumer schemas are incompatible and no \
                      transformation is attached.",
        remediation: "Usually healed automatically by attaching a named transformation, or \
                      by relaxing the consumer schema to `any` when the port's template \
                      default is universal. Attach an explicit `transformation` to override.",
    },
    CategoryInfo {
        category: categories::UNSUPPORTED_SCHEMA_VERSION,
        healable: false,
        description: "The declared schema_version is outside the supported set. Checked \
                      once, before any healing round.",
        remediation: "Re-export the blueprint with a supported schema version, or extend \
                      `supported_versions` in flowfix.toml if the engine genuinely supports it.",
    },
    CategoryInfo {
        category: categories::STAGNATION_EXCEEDED,
        healable: false,
        description: "Consecutive healing rounds made no progress while violations \
                      persisted; the orchestrator aborted before exhausting its attempt \
                      budget.",
        remediation: "Inspect the remaining violations in the same report; they name the \
                      gaps the healing library cannot infer.",
    },
];

pub fn lookup_category(key: &str) -> Option<&'static CategoryInfo> {
    CATEGORY_REGISTRY.iter().find(|c| c.category == key)
}

pub fn list_category_keys() -> Vec<&'static str> {
    CATEGORY_REGISTRY.iter().map(|c| c.category).collect()
}

/// One healing transform, as shown by `list-heals`.
pub struct HealInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub heals: &'static str,
    pub description: &'static str,
}

pub const HEAL_REGISTRY: &[HealInfo] = &[
    HealInfo {
        id: "binding_inference",
        title: "Missing-binding inference",
        heals: categories::MISSING_BINDING,
        description: "Pairs unbound output ports with unbound input ports by declaration \
                      order and synthesizes one compact binding per pair.",
    },
    HealInfo {
        id: "transformation_synthesis",
        title: "Schema-mismatch transformation synthesis",
        heals: categories::SCHEMA_COMPATIBILITY,
        description: "Re-scans every binding after inference has run; relaxes consumer \
                      schemas whose template default is `any`, and attaches a named \
                      convert_<from>_to_<to> transformation otherwise.",
    },
    HealInfo {
        id: "policy_defaults",
        title: "Policy defaulting",
        heals: "policy absence",
        description: "Inserts the canonical default policy block when a blueprint has none.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_taxonomy_category_is_documented() {
        for category in [
            categories::UNKNOWN_REFERENCE,
            categories::MISSING_BINDING,
            categories::SCHEMA_COMPATIBILITY,
            categories::UNSUPPORTED_SCHEMA_VERSION,
            categories::STAGNATION_EXCEEDED,
        ] {
            assert!(
                lookup_category(category).is_some(),
                "undocumented category {}",
                category
            );
        }
    }

    #[test]
    fn healability_flags_match_the_taxonomy() {
        assert!(!lookup_category(categories::UNKNOWN_REFERENCE).unwrap().healable);
        assert!(lookup_category(categories::MISSING_BINDING).unwrap().healable);
        assert!(
            lookup_category(categories::SCHEMA_COMPATIBILITY)
                .unwrap()
                .healable
        );
    }
}
