//! Clap-free settings for the resolve pipeline.

use flowfix_types::schema::{DEFAULT_BLUEPRINT_VERSION, SUPPORTED_BLUEPRINT_VERSIONS};

#[derive(Debug, Clone)]
pub struct ResolveSettings {
    /// Validation attempts before the loop gives up.
    pub max_attempts: u32,

    /// Blueprint schema versions accepted without healing.
    pub supported_versions: Vec<String>,

    /// Version assigned to documents that omit `schema_version`.
    pub default_version: String,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            supported_versions: SUPPORTED_BLUEPRINT_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
            default_version: DEFAULT_BLUEPRINT_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_engine_contract() {
        let settings = ResolveSettings::default();
        assert_eq!(settings.max_attempts, 4);
        assert_eq!(settings.supported_versions, vec!["1.0.0".to_string()]);
        assert_eq!(settings.default_version, "1.0.0");
    }
}
