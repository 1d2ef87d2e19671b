//! Scan orchestration.
//!
//! Wires the pipeline together: discovery, parallel per-chart analysis,
//! dependency propagation behind a barrier, consolidation, and diagram
//! rendering. Produces a complete, internally-consistent [`ScanResult`] or
//! an explicit input error; never a half-populated result.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use crate::config::types::ScanConfig;
use crate::error::{ChartScopeError, Result};
use crate::scanner::dependency_analyzer::DependencyAnalyzer;
use crate::scanner::discovery;
use crate::scanner::dockerfile_analyzer::DockerfileAnalyzer;
use crate::scanner::exposure_analyzer::ExposureAnalyzer;
use crate::scanner::mermaid::MermaidBuilder;
use crate::scanner::path_consolidator::PathConsolidator;
use crate::scanner::types::{
    ContainerRecord, ExposureLevel, NetworkTopology, ScanResult, ScanSummary,
};

/// Reported (not thrown) condition for a repository without charts.
pub const NO_CHARTS_ERROR: &str = "No Helm charts found in repository";

/// Orchestrates a full exposure scan over one repository.
#[derive(Debug, Default)]
pub struct ExposureScanner {
    config: ScanConfig,
    exposure_analyzer: ExposureAnalyzer,
    dockerfile_analyzer: DockerfileAnalyzer,
    dependency_analyzer: DependencyAnalyzer,
    path_consolidator: PathConsolidator,
    mermaid_builder: MermaidBuilder,
}

impl ExposureScanner {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            config,
            exposure_analyzer: ExposureAnalyzer::new(),
            dockerfile_analyzer: DockerfileAnalyzer::new(),
            dependency_analyzer: DependencyAnalyzer::new(),
            path_consolidator: PathConsolidator::new(),
            mermaid_builder: MermaidBuilder::new(),
        }
    }

    /// Scan a repository and assemble the full result.
    ///
    /// Fails only when `repo_path` does not exist. A path without chart
    /// manifests succeeds with the reported error in `scan_summary`, and a
    /// malformed chart degrades to its safest classification without
    /// aborting the rest of the scan.
    pub fn scan(&self, repo_path: &Path) -> Result<ScanResult> {
        if !repo_path.exists() {
            return Err(ChartScopeError::RepositoryNotFound(repo_path.to_path_buf()));
        }

        let charts = discovery::discover_charts(repo_path, &self.config);
        info!("discovered {} chart(s) under {}", charts.len(), repo_path.display());

        if charts.is_empty() {
            return Ok(Self::empty_result(repo_path, NO_CHARTS_ERROR));
        }

        // Per-chart analysis has no cross-chart dependency; fan out on a
        // bounded pool. Each worker owns its chart's reads and output.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.effective_worker_threads())
            .build()
            .map_err(|e| ChartScopeError::ScanFailed(e.to_string()))?;

        let per_chart: Vec<(Vec<ContainerRecord>, Vec<String>)> = pool.install(|| {
            charts
                .par_iter()
                .map(|chart| {
                    (
                        self.exposure_analyzer.analyze_chart(chart),
                        self.dockerfile_analyzer.analyze_chart(chart),
                    )
                })
                .collect()
        });

        // Barrier: propagation needs every chart's direct classification.
        let mut records = Vec::new();
        let mut source_paths: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (chart, (chart_records, chart_paths)) in charts.iter().zip(per_chart) {
            records.extend(chart_records);
            source_paths.insert(chart.name.clone(), chart_paths);
        }

        let edges = self.dependency_analyzer.build_edges(&charts);
        let records = self.dependency_analyzer.propagate(records, &edges);

        let master_paths = self
            .path_consolidator
            .build_master_paths(&records, &source_paths);
        let network_topology = self.path_consolidator.build_network_topology(&records);
        let mermaid_diagram = self.mermaid_builder.build_diagram(&records);
        let scan_summary = Self::build_summary(&records);

        debug_assert_eq!(
            scan_summary.high_exposure + scan_summary.medium_exposure + scan_summary.low_exposure,
            scan_summary.total_containers
        );
        debug_assert_eq!(network_topology.len(), records.len());
        debug!(
            "scan complete: {} container(s) across {} chart(s)",
            scan_summary.total_containers, scan_summary.charts_analyzed
        );

        Ok(ScanResult {
            repo_path: repo_path.display().to_string(),
            scan_summary,
            containers: records,
            master_paths,
            network_topology,
            mermaid_diagram,
        })
    }

    fn build_summary(records: &[ContainerRecord]) -> ScanSummary {
        let count_level = |level: ExposureLevel| {
            records
                .iter()
                .filter(|r| r.exposure_level == level)
                .count()
        };
        let charts: BTreeSet<&str> = records.iter().map(|r| r.chart.as_str()).collect();

        ScanSummary {
            total_containers: records.len(),
            high_exposure: count_level(ExposureLevel::High),
            medium_exposure: count_level(ExposureLevel::Medium),
            low_exposure: count_level(ExposureLevel::Low),
            charts_analyzed: charts.len(),
            error: None,
        }
    }

    fn empty_result(repo_path: &Path, error: &str) -> ScanResult {
        ScanResult {
            repo_path: repo_path.display().to_string(),
            scan_summary: ScanSummary {
                error: Some(error.to_string()),
                ..ScanSummary::default()
            },
            containers: Vec::new(),
            master_paths: BTreeMap::new(),
            network_topology: NetworkTopology::default(),
            mermaid_diagram: String::new(),
        }
    }

}
