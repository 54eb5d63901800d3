//! Wire (surface) forms of the flowfix documents.
//!
//! The wire layer owns every surface concern the engine must tolerate or
//! preserve: both binding target shapes, optional fields, and the YAML/JSON
//! duality of input documents. Internal models never see surface shapes.

use std::fmt;

pub mod blueprint_v1;
pub mod report_v1;

pub use blueprint_v1::{BindingV1, BlueprintV1, ComponentV1, EndpointV1, PortV1, SystemV1};
pub use report_v1::ReportV1;

/// Errors emitted while converting wire models to internal models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Port names must begin with `input`, `output`, or `error`.
    InvalidPortName { component: String, port: String },
    /// Component names must be unique within a system.
    DuplicateComponent { name: String },
    /// A binding's target list was empty.
    EmptyBindingTargets { from: String },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::InvalidPortName { component, port } => write!(
                f,
                "port '{}' on component '{}' must begin with input/output/error",
                port, component
            ),
            WireError::DuplicateComponent { name } => {
                write!(f, "duplicate component name '{}'", name)
            }
            WireError::EmptyBindingTargets { from } => {
                write!(f, "binding from {} has no targets", from)
            }
        }
    }
}

impl std::error::Error for WireError {}

/// Input/output document encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Detect from a file extension; defaults to YAML for unknown ones.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Errors from reading a blueprint document.
#[derive(Debug)]
pub enum ParseError {
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Wire(WireError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Yaml(e) => write!(f, "invalid blueprint YAML: {}", e),
            ParseError::Json(e) => write!(f, "invalid blueprint JSON: {}", e),
            ParseError::Wire(e) => write!(f, "malformed blueprint: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Yaml(e) => Some(e),
            ParseError::Json(e) => Some(e),
            ParseError::Wire(e) => Some(e),
        }
    }
}

impl From<WireError> for ParseError {
    fn from(e: WireError) -> Self {
        ParseError::Wire(e)
    }
}

/// Parse a blueprint document into the internal model.
pub fn parse_blueprint(
    input: &str,
    format: DocumentFormat,
) -> Result<crate::blueprint::Blueprint, ParseError> {
    let wire: BlueprintV1 = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(input).map_err(ParseError::Yaml)?,
        DocumentFormat::Json => serde_json::from_str(input).map_err(ParseError::Json)?,
    };
    Ok(crate::blueprint::Blueprint::try_from(wire)?)
}

/// Serialize the internal model back to a document, preserving binding shapes.
pub fn render_blueprint(
    blueprint: &crate::blueprint::Blueprint,
    format: DocumentFormat,
) -> Result<String, ParseError> {
    let wire = BlueprintV1::from(blueprint);
    match format {
        DocumentFormat::Yaml => serde_yaml::to_string(&wire).map_err(ParseError::Yaml),
        DocumentFormat::Json => {
            serde_json::to_string_pretty(&wire).map_err(ParseError::Json)
        }
    }
}
