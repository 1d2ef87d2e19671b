//! # Scanner Module
//!
//! Exposure analysis for Helm chart repositories. Determines, for every
//! deployable workload, how reachable it is from the public network:
//! - Ingress and service-type evidence extraction per chart environment
//! - One-hop transitive exposure across chart dependencies
//! - Dockerfile source-path consolidation for remediation triage
//! - Network topology partition and Mermaid diagram rendering
//!
//! The pipeline is explicit and immutable: every stage takes the prior
//! stage's output and returns a new value, so each stage is independently
//! testable.

pub mod dependency_analyzer;
pub mod discovery;
pub mod dockerfile_analyzer;
pub mod evidence;
pub mod exposure_analyzer;
pub mod mermaid;
pub mod parser;
pub mod path_consolidator;
pub mod scan;
pub mod types;

// Re-export the main entry points and result types
pub use dependency_analyzer::{DependencyAnalyzer, DependencyEdge};
pub use discovery::{ChartUnit, discover_charts};
pub use dockerfile_analyzer::DockerfileAnalyzer;
pub use exposure_analyzer::ExposureAnalyzer;
pub use mermaid::MermaidBuilder;
pub use path_consolidator::PathConsolidator;
pub use scan::{ExposureScanner, NO_CHARTS_ERROR};
pub use types::{
    ContainerRecord, ExposureLevel, GatewayType, MasterPathEntry, NetworkTopology, ScanResult,
    ScanSummary,
};
