//! Core types for the exposure scanner.
//!
//! These types form the wire contract consumed by downstream triage tooling:
//! - `ExposureLevel` - three-tier exposure classification
//! - `GatewayType` - how a workload is reachable
//! - `ContainerRecord` - one classified workload instance
//! - `ScanResult` - the complete scan artifact
//!
//! Everything here is serde-serializable and round-trip stable: decoding a
//! serialized `ScanResult` and re-encoding it reproduces an equal structure.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-tier network exposure classification.
///
/// Ordered from least to most exposed: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExposureLevel {
    /// No declared network path from outside the cluster.
    #[default]
    Low,
    /// Reachable through a dependency on an exposed chart.
    Medium,
    /// Directly reachable from the public network.
    High,
}

impl ExposureLevel {
    /// Numeric score paired with this level (`LOW=1`, `MEDIUM=2`, `HIGH=3`).
    pub fn score(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Inverse of [`score`](Self::score).
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Parse a level from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for ExposureLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score().cmp(&other.score())
    }
}

impl PartialOrd for ExposureLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How a workload is reachable from outside the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GatewayType {
    /// Ingress with an nginx ingress class.
    #[serde(rename = "nginx")]
    Nginx,
    /// Ingress without a recognized controller class.
    #[serde(rename = "Ingress")]
    Ingress,
    /// Service of type LoadBalancer or NodePort.
    #[serde(rename = "LoadBalancer/NodePort")]
    LoadBalancerNodePort,
    /// Reachable only through a dependency on an exposed chart.
    #[serde(rename = "Service Dependency")]
    ServiceDependency,
    /// No declared external path.
    #[default]
    #[serde(rename = "Internal")]
    Internal,
}

impl GatewayType {
    /// Get the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nginx => "nginx",
            Self::Ingress => "Ingress",
            Self::LoadBalancerNodePort => "LoadBalancer/NodePort",
            Self::ServiceDependency => "Service Dependency",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for GatewayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified workload instance.
///
/// A chart yields one record per detected environment, or several records
/// when it declares multiple ingress hosts. `exposure_score` and
/// `exposure_level` always agree per [`ExposureLevel::score`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// `<chart>-<env>-container` when the chart has multiple environments,
    /// else `<chart>-container`.
    pub name: String,
    /// Owning chart name.
    pub chart: String,
    /// Environment this record was evaluated for (`default` for base values).
    pub environment: String,
    /// How the workload is reachable.
    pub gateway_type: GatewayType,
    /// First matching ingress host, when ingress evidence fired.
    pub host: Option<String>,
    /// Numeric exposure score (1..=3).
    pub exposure_score: u8,
    /// Exposure classification.
    pub exposure_level: ExposureLevel,
    /// Ordered chart names from the network boundary to this container.
    pub access_chain: Vec<String>,
    /// Charts named earlier in `access_chain` that expose this container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exposed_by: Vec<String>,
}

/// Per-chart entry in the `master_paths` index.
///
/// Maps a chart's consolidated source directories to its most-exposed
/// container so a code-level finding can be re-scored by network context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPathEntry {
    /// Consolidated source directory tokens (trailing-slash form).
    pub source_paths: Vec<String>,
    /// Highest exposure level among the chart's records.
    pub exposure_level: ExposureLevel,
    /// The chart's most-exposed container record.
    pub most_exposed_container: ContainerRecord,
}

/// Three-way partition of container names by exposure level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTopology {
    /// Names of HIGH-exposure containers.
    pub exposed_containers: Vec<String>,
    /// Names of MEDIUM-exposure containers.
    pub linked_containers: Vec<String>,
    /// Names of LOW-exposure containers.
    pub internal_containers: Vec<String>,
}

impl NetworkTopology {
    /// Total number of container names across the three buckets.
    pub fn len(&self) -> usize {
        self.exposed_containers.len() + self.linked_containers.len() + self.internal_containers.len()
    }

    /// Check whether all buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aggregate counts plus the reported no-charts condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Count of all container records.
    pub total_containers: usize,
    /// Count of HIGH records.
    pub high_exposure: usize,
    /// Count of MEDIUM records.
    pub medium_exposure: usize,
    /// Count of LOW records.
    pub low_exposure: usize,
    /// Count of distinct chart names with at least one record.
    pub charts_analyzed: usize,
    /// Set when the path exists but holds no chart manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The complete scan artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Repository root that was scanned.
    pub repo_path: String,
    /// Aggregate counts and invariant cross-checks.
    pub scan_summary: ScanSummary,
    /// All container records, in chart-discovery order.
    pub containers: Vec<ContainerRecord>,
    /// Chart name -> consolidated paths + most-exposed representative.
    pub master_paths: BTreeMap<String, MasterPathEntry>,
    /// Partition of container names by exposure level.
    pub network_topology: NetworkTopology,
    /// Rendered `graph TD` diagram.
    pub mermaid_diagram: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(ExposureLevel::High > ExposureLevel::Medium);
        assert!(ExposureLevel::Medium > ExposureLevel::Low);
        assert_eq!(
            [ExposureLevel::Medium, ExposureLevel::High, ExposureLevel::Low]
                .iter()
                .max(),
            Some(&ExposureLevel::High)
        );
    }

    #[test]
    fn test_level_score_agreement() {
        for level in [ExposureLevel::Low, ExposureLevel::Medium, ExposureLevel::High] {
            assert_eq!(ExposureLevel::from_score(level.score()), Some(level));
        }
        assert_eq!(ExposureLevel::from_score(0), None);
        assert_eq!(ExposureLevel::from_score(4), None);
    }

    #[test]
    fn test_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ExposureLevel::High).unwrap(),
            "\"HIGH\""
        );
        assert_eq!(
            serde_json::from_str::<ExposureLevel>("\"MEDIUM\"").unwrap(),
            ExposureLevel::Medium
        );
    }

    #[test]
    fn test_gateway_wire_strings() {
        assert_eq!(
            serde_json::to_string(&GatewayType::LoadBalancerNodePort).unwrap(),
            "\"LoadBalancer/NodePort\""
        );
        assert_eq!(
            serde_json::to_string(&GatewayType::ServiceDependency).unwrap(),
            "\"Service Dependency\""
        );
        assert_eq!(serde_json::to_string(&GatewayType::Nginx).unwrap(), "\"nginx\"");
    }

    #[test]
    fn test_record_round_trip() {
        let record = ContainerRecord {
            name: "web-container".to_string(),
            chart: "web".to_string(),
            environment: "default".to_string(),
            gateway_type: GatewayType::Nginx,
            host: Some("web.example.com".to_string()),
            exposure_score: 3,
            exposure_level: ExposureLevel::High,
            access_chain: vec!["web".to_string()],
            exposed_by: Vec::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ContainerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
