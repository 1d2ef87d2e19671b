//! Values.yaml parser.
//!
//! Wraps a parsed values tree with dotted-path access and the *total* typed
//! accessors the evidence layer relies on: a field of the wrong type reads as
//! absent, never as an error.

use std::path::Path;

use serde_yaml::Value;

/// Parsed values file.
#[derive(Debug, Clone)]
pub struct ValuesFile {
    /// The parsed YAML values.
    pub values: Value,
}

impl ValuesFile {
    /// Create a new empty values file.
    pub fn empty() -> Self {
        Self {
            values: Value::Mapping(serde_yaml::Mapping::new()),
        }
    }

    /// Get a value by path (e.g., "ingress.enabled").
    pub fn get(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();
        let mut current = &self.values;

        for part in parts {
            match current {
                Value::Mapping(map) => {
                    current = map.get(Value::String(part.to_string()))?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// Read a boolean at `path`. Any non-boolean value reads as `None`.
    pub fn bool_at(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Read a non-empty string at `path`. Empty or non-string values read as
    /// `None`.
    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Produce a new values file with `overlay` deep-merged over `self`.
    ///
    /// Mapping keys merge recursively; scalars and sequences in the overlay
    /// replace the base value, matching Helm's `-f` layering.
    pub fn merged_with(&self, overlay: &ValuesFile) -> ValuesFile {
        ValuesFile {
            values: merge_values(&self.values, &overlay.values),
        }
    }

    /// All string leaves as `(dotted key path, value)` pairs, in document
    /// order. Sequence elements inherit their parent path.
    pub fn string_entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        collect_strings(&self.values, String::new(), &mut out);
        out
    }
}

fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match merged.get(key.clone()) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Mapping(merged)
        }
        _ => overlay.clone(),
    }
}

fn collect_strings(value: &Value, path: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                if let Some(key) = key.as_str() {
                    let child_path = if path.is_empty() {
                        key.to_string()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    collect_strings(child, child_path, out);
                }
            }
        }
        Value::Sequence(seq) => {
            for child in seq {
                collect_strings(child, path.clone(), out);
            }
        }
        Value::String(s) => out.push((path, s.clone())),
        _ => {}
    }
}

/// Parse error for values.yaml.
#[derive(Debug)]
pub struct ValuesParseError {
    pub message: String,
    pub line: Option<u32>,
}

impl std::fmt::Display for ValuesParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: {}", line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValuesParseError {}

/// Parse values.yaml content.
pub fn parse_values_yaml(content: &str) -> Result<ValuesFile, ValuesParseError> {
    if content.trim().is_empty() {
        return Ok(ValuesFile::empty());
    }

    let values: Value = serde_yaml::from_str(content).map_err(|e| {
        let line = e.location().map(|l| l.line() as u32);
        ValuesParseError {
            message: e.to_string(),
            line,
        }
    })?;

    // An all-comments file parses to null; treat it as empty.
    if values.is_null() {
        return Ok(ValuesFile::empty());
    }

    Ok(ValuesFile { values })
}

/// Parse values.yaml from a file path.
pub fn parse_values_yaml_file(path: &Path) -> Result<ValuesFile, ValuesParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| ValuesParseError {
        message: format!("Failed to read file: {}", e),
        line: None,
    })?;
    parse_values_yaml(&content)
}
