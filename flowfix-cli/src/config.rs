//! Configuration file loading for flowfix.
//!
//! Discovers and loads `flowfix.toml` from the input document's directory.
//! CLI arguments take precedence over config file settings.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use flowfix_core::ResolveSettings;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "flowfix.toml";

/// Top-level configuration from flowfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlowfixConfig {
    /// Resolution loop settings.
    pub resolution: ResolutionConfig,

    /// Artifact output settings.
    pub output: OutputConfig,
}

/// Resolution section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Validation attempts before the loop gives up.
    pub max_attempts: Option<u32>,

    /// Blueprint schema versions accepted without healing.
    pub supported_versions: Option<Vec<String>>,

    /// Version assigned to documents that omit `schema_version`.
    pub default_version: Option<String>,
}

/// Output section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for resolution artifacts.
    pub out_dir: Option<Utf8PathBuf>,
}

/// Discover the flowfix.toml config file next to the input document.
pub fn discover_config(input_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = input_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<FlowfixConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    toml::from_str(&contents).with_context(|| format!("parse {}", path))
}

impl FlowfixConfig {
    /// Fold the config under CLI flags: an explicit flag always wins.
    pub fn settings(&self, cli_max_attempts: Option<u32>) -> ResolveSettings {
        let defaults = ResolveSettings::default();
        ResolveSettings {
            max_attempts: cli_max_attempts
                .or(self.resolution.max_attempts)
                .unwrap_or(defaults.max_attempts),
            supported_versions: self
                .resolution
                .supported_versions
                .clone()
                .unwrap_or(defaults.supported_versions),
            default_version: self
                .resolution
                .default_version
                .clone()
                .unwrap_or(defaults.default_version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_engine_defaults() {
        let config: FlowfixConfig = toml::from_str("").expect("parse");
        let settings = config.settings(None);
        assert_eq!(settings.max_attempts, 4);
        assert_eq!(settings.supported_versions, vec!["1.0.0".to_string()]);
    }

    #[test]
    fn config_values_apply_when_no_flag_is_given() {
        let config: FlowfixConfig = toml::from_str(
            r#"
[resolution]
max_attempts = 7
supported_versions = ["1.0.0", "1.1.0"]

[output]
out_dir = "build/flowfix"
"#,
        )
        .expect("parse");
        let settings = config.settings(None);
        assert_eq!(settings.max_attempts, 7);
        assert_eq!(settings.supported_versions.len(), 2);
        assert_eq!(
            config.output.out_dir.as_deref(),
            Some(Utf8Path::new("build/flowfix"))
        );
    }

    #[test]
    fn cli_flag_wins_over_config() {
        let config: FlowfixConfig = toml::from_str(
            r#"
[resolution]
max_attempts = 7
"#,
        )
        .expect("parse");
        let settings = config.settings(Some(2));
        assert_eq!(settings.max_attempts, 2);
    }

    #[test]
    fn partial_sections_fall_back_per_field() {
        let config: FlowfixConfig = toml::from_str(
            r#"
[resolution]
default_version = "1.0.0"
"#,
        )
        .expect("parse");
        let settings = config.settings(None);
        assert_eq!(settings.max_attempts, 4);
        assert_eq!(settings.default_version, "1.0.0");
    }
}
