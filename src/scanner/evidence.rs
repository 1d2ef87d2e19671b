//! Evidence extraction from chart values.
//!
//! Classifies loosely-shaped configuration into one tagged variant per
//! evidence kind, so all "is this field present and well-typed" checking
//! lives here instead of in the scoring logic. Extraction is total: a
//! malformed field reads as absent evidence, never as an error.

use serde_yaml::Value;

use crate::scanner::parser::values::ValuesFile;

/// Externally-reachable service kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    LoadBalancer,
    NodePort,
}

/// The network-facing evidence one chart/environment pair yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExposureEvidence {
    /// Ingress enabled with at least one non-empty host.
    Ingress {
        hosts: Vec<String>,
        nginx_class: bool,
    },
    /// Service of an externally-reachable type.
    Service { kind: ServiceKind },
    /// No direct network-facing configuration found.
    Absent,
}

/// Evaluate evidence rules in priority order, first match wins.
pub fn classify(values: &ValuesFile) -> ExposureEvidence {
    // Rule 1: ingress enabled with at least one host entry.
    if values.bool_at("ingress.enabled") == Some(true) {
        let hosts = ingress_hosts(values);
        if !hosts.is_empty() {
            return ExposureEvidence::Ingress {
                hosts,
                nginx_class: has_nginx_class(values),
            };
        }
    }

    // Rule 2: externally-reachable service type.
    if let Some(kind) = service_kind(values) {
        return ExposureEvidence::Service { kind };
    }

    ExposureEvidence::Absent
}

/// Declared ingress hosts, in order. Entries may be mappings with a `host`
/// key or plain strings; empty and non-string entries are skipped.
pub fn ingress_hosts(values: &ValuesFile) -> Vec<String> {
    let Some(Value::Sequence(entries)) = values.get("ingress.hosts") else {
        return Vec::new();
    };

    let mut hosts = Vec::new();
    for entry in entries {
        let host = match entry {
            Value::Mapping(map) => map
                .get(Value::String("host".to_string()))
                .and_then(Value::as_str),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        };
        if let Some(host) = host {
            let host = host.trim();
            if !host.is_empty() {
                hosts.push(host.to_string());
            }
        }
    }
    hosts
}

/// Whether the ingress references an nginx ingress class, either through the
/// class fields or a `kubernetes.io/ingress.class`-style annotation.
fn has_nginx_class(values: &ValuesFile) -> bool {
    for path in ["ingress.className", "ingress.ingressClassName", "ingress.class"] {
        if let Some(class) = values.str_at(path) {
            if class.to_lowercase().contains("nginx") {
                return true;
            }
        }
    }

    if let Some(Value::Mapping(annotations)) = values.get("ingress.annotations") {
        for (key, value) in annotations {
            let (Some(key), Some(value)) = (key.as_str(), value.as_str()) else {
                continue;
            };
            if key.contains("ingress.class") && value.to_lowercase().contains("nginx") {
                return true;
            }
        }
    }

    false
}

fn service_kind(values: &ValuesFile) -> Option<ServiceKind> {
    match values.str_at("service.type")? {
        "LoadBalancer" => Some(ServiceKind::LoadBalancer),
        "NodePort" => Some(ServiceKind::NodePort),
        _ => None,
    }
}
