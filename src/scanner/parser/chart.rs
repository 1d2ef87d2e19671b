//! Chart.yaml parser.
//!
//! Parses the subset of Helm chart metadata the exposure scanner consumes:
//! the chart name and its declared dependencies.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Chart dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChartDependency {
    /// Dependency chart name
    pub name: String,
    /// Version constraint (SemVer)
    #[serde(default)]
    pub version: Option<String>,
    /// Repository URL
    #[serde(default)]
    pub repository: Option<String>,
    /// Condition for enabling
    #[serde(default)]
    pub condition: Option<String>,
    /// Alias for the dependency
    #[serde(default)]
    pub alias: Option<String>,
}

/// Parsed Chart.yaml metadata, trimmed to the fields exposure analysis uses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartManifest {
    /// The name of the chart. Empty when the manifest omits it; callers fall
    /// back to the chart directory name.
    #[serde(default)]
    pub name: String,

    /// A SemVer 2 version
    #[serde(default)]
    pub version: Option<String>,

    /// A single-sentence description of this project
    #[serde(default)]
    pub description: Option<String>,

    /// Declared chart dependencies
    #[serde(default)]
    pub dependencies: Vec<ChartDependency>,
}

impl ChartManifest {
    /// Get dependency names.
    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies.iter().map(|d| d.name.as_str()).collect()
    }
}

/// Parse error for Chart.yaml.
#[derive(Debug)]
pub struct ChartParseError {
    pub message: String,
    pub line: Option<u32>,
}

impl std::fmt::Display for ChartParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: {}", line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ChartParseError {}

/// Parse Chart.yaml content.
pub fn parse_chart_yaml(content: &str) -> Result<ChartManifest, ChartParseError> {
    serde_yaml::from_str(content).map_err(|e| {
        let line = e.location().map(|l| l.line() as u32);
        ChartParseError {
            message: e.to_string(),
            line,
        }
    })
}

/// Parse Chart.yaml from a file path.
pub fn parse_chart_yaml_file(path: &Path) -> Result<ChartManifest, ChartParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| ChartParseError {
        message: format!("Failed to read file: {}", e),
        line: None,
    })?;
    parse_chart_yaml(&content)
}
