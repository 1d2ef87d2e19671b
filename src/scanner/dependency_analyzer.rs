//! Chart dependency graph and transitive exposure.
//!
//! Builds directed edges from declared chart dependencies and
//! service-reference values, then upgrades charts that sit one hop behind a
//! directly-exposed chart. Propagation deliberately stops after one hop: a
//! chart two hops from an exposed chart stays internal.

use std::collections::{BTreeSet, HashSet};

use log::{debug, info};

use crate::scanner::discovery::ChartUnit;
use crate::scanner::parser::values::ValuesFile;
use crate::scanner::types::{ContainerRecord, ExposureLevel, GatewayType};

/// Directed relation: `source` calls/depends on `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
}

/// Value keys whose string contents are treated as service references.
const SERVICE_REF_SUFFIXES: [&str; 4] = ["host", "url", "service", "endpoint"];

#[derive(Debug, Default)]
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Build the edge set across all discovered charts.
    ///
    /// Sources of evidence, deduplicated in discovery order:
    /// - `Chart.yaml` dependency declarations naming another discovered chart
    /// - string values under service-reference keys that mention another
    ///   discovered chart name as a hostname-like token
    pub fn build_edges(&self, charts: &[ChartUnit]) -> Vec<DependencyEdge> {
        let known: BTreeSet<&str> = charts.iter().map(|c| c.name.as_str()).collect();
        let mut edges = Vec::new();
        let mut seen = HashSet::new();

        for chart in charts {
            for dep in &chart.manifest.dependencies {
                let target = dep.name.trim();
                if target.is_empty() || target == chart.name || !known.contains(target) {
                    continue;
                }
                push_edge(&mut edges, &mut seen, &chart.name, target);
            }

            let mut values_files: Vec<&ValuesFile> = vec![&chart.base_values];
            values_files.extend(chart.overlays.iter().map(|(_, v)| v));
            for values in values_files {
                for (key, value) in values.string_entries() {
                    if !is_service_ref_key(&key) {
                        continue;
                    }
                    for target in &known {
                        if *target != chart.name && references_chart(&value, target) {
                            push_edge(&mut edges, &mut seen, &chart.name, target);
                        }
                    }
                }
            }
        }

        debug!("dependency graph: {} edge(s)", edges.len());
        edges
    }

    /// Upgrade charts one hop behind a directly-HIGH chart.
    ///
    /// The HIGH set is computed once from the direct classification and never
    /// extended during the pass, which is what keeps this a single-hop
    /// expansion and makes the operation idempotent.
    pub fn propagate(
        &self,
        mut records: Vec<ContainerRecord>,
        edges: &[DependencyEdge],
    ) -> Vec<ContainerRecord> {
        let direct_high: BTreeSet<String> = records
            .iter()
            .filter(|r| r.exposure_level == ExposureLevel::High)
            .map(|r| r.chart.clone())
            .collect();

        let mut chart_order = Vec::new();
        let mut seen_charts = HashSet::new();
        for record in &records {
            if seen_charts.insert(record.chart.clone()) {
                chart_order.push(record.chart.clone());
            }
        }

        let mut upgraded = 0usize;
        for chart in &chart_order {
            let all_low = records
                .iter()
                .filter(|r| r.chart == *chart)
                .all(|r| r.exposure_level == ExposureLevel::Low);
            if !all_low {
                continue;
            }

            let mut exposers = Vec::new();
            for edge in edges {
                if edge.source == *chart
                    && direct_high.contains(&edge.target)
                    && !exposers.contains(&edge.target)
                {
                    exposers.push(edge.target.clone());
                }
            }
            if exposers.is_empty() {
                continue;
            }

            debug!("{}: upgraded to MEDIUM via {:?}", chart, exposers);
            for record in records.iter_mut().filter(|r| r.chart == *chart) {
                record.exposure_level = ExposureLevel::Medium;
                record.exposure_score = ExposureLevel::Medium.score();
                record.gateway_type = GatewayType::ServiceDependency;
                let mut chain = exposers.clone();
                chain.append(&mut record.access_chain);
                record.access_chain = chain;
                record.exposed_by = exposers.clone();
                upgraded += 1;
            }
        }

        if upgraded > 0 {
            info!("dependency propagation upgraded {} record(s)", upgraded);
        }
        records
    }
}

fn push_edge(
    edges: &mut Vec<DependencyEdge>,
    seen: &mut HashSet<(String, String)>,
    source: &str,
    target: &str,
) {
    if seen.insert((source.to_string(), target.to_string())) {
        edges.push(DependencyEdge {
            source: source.to_string(),
            target: target.to_string(),
        });
    }
}

fn is_service_ref_key(key: &str) -> bool {
    let last = key.rsplit('.').next().unwrap_or(key).to_ascii_lowercase();
    SERVICE_REF_SUFFIXES
        .iter()
        .any(|suffix| last.ends_with(suffix))
}

/// Whether `value` names `chart` as a hostname-like token, e.g.
/// `http://gateway:8080` or `gateway.default.svc` reference chart `gateway`.
fn references_chart(value: &str, chart: &str) -> bool {
    value
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .any(|token| token == chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::parser::chart::{ChartDependency, ChartManifest};
    use crate::scanner::parser::values::parse_values_yaml;

    fn unit(name: &str, deps: &[&str], values: &str) -> ChartUnit {
        ChartUnit {
            name: name.to_string(),
            dir: std::path::PathBuf::from(format!("/tmp/{}", name)),
            manifest: ChartManifest {
                name: name.to_string(),
                version: None,
                description: None,
                dependencies: deps
                    .iter()
                    .map(|d| ChartDependency {
                        name: d.to_string(),
                        version: None,
                        repository: None,
                        condition: None,
                        alias: None,
                    })
                    .collect(),
            },
            base_values: parse_values_yaml(values).unwrap(),
            overlays: Vec::new(),
            dockerfiles: Vec::new(),
        }
    }

    fn record(chart: &str, level: ExposureLevel) -> ContainerRecord {
        ContainerRecord {
            name: format!("{}-container", chart),
            chart: chart.to_string(),
            environment: "default".to_string(),
            gateway_type: match level {
                ExposureLevel::High => GatewayType::LoadBalancerNodePort,
                _ => GatewayType::Internal,
            },
            host: None,
            exposure_score: level.score(),
            exposure_level: level,
            access_chain: vec![chart.to_string()],
            exposed_by: Vec::new(),
        }
    }

    #[test]
    fn test_edges_from_manifest() {
        let charts = vec![
            unit("backend", &["gateway", "unknown-chart"], "{}"),
            unit("gateway", &[], "{}"),
        ];
        let edges = DependencyAnalyzer::new().build_edges(&charts);
        // Edges only point at discovered charts.
        assert_eq!(
            edges,
            vec![DependencyEdge {
                source: "backend".to_string(),
                target: "gateway".to_string(),
            }]
        );
    }

    #[test]
    fn test_edges_from_service_reference_values() {
        let charts = vec![
            unit(
                "worker",
                &[],
                "queue:\n  url: http://gateway:8080/jobs\n",
            ),
            unit("gateway", &[], "{}"),
            unit("api", &[], "{}"),
        ];
        let edges = DependencyAnalyzer::new().build_edges(&charts);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "worker");
        assert_eq!(edges[0].target, "gateway");
    }

    #[test]
    fn test_reference_tokenization() {
        assert!(references_chart("http://gateway:8080", "gateway"));
        assert!(references_chart("gateway.default.svc.cluster.local", "gateway"));
        // Substrings of longer tokens do not count.
        assert!(!references_chart("http://api-gateway:8080", "api"));
        assert!(!references_chart("http://api-gateway:8080", "gateway"));
        assert!(references_chart("http://api-gateway:8080", "api-gateway"));
    }

    #[test]
    fn test_one_hop_upgrade() {
        let records = vec![
            record("gateway", ExposureLevel::High),
            record("backend", ExposureLevel::Low),
        ];
        let edges = vec![DependencyEdge {
            source: "backend".to_string(),
            target: "gateway".to_string(),
        }];

        let records = DependencyAnalyzer::new().propagate(records, &edges);
        let backend = records.iter().find(|r| r.chart == "backend").unwrap();
        assert_eq!(backend.exposure_level, ExposureLevel::Medium);
        assert_eq!(backend.exposure_score, 2);
        assert_eq!(backend.gateway_type, GatewayType::ServiceDependency);
        assert_eq!(backend.access_chain, vec!["gateway", "backend"]);
        assert_eq!(backend.exposed_by, vec!["gateway"]);
    }

    #[test]
    fn test_propagation_stops_after_one_hop() {
        let records = vec![
            record("edge", ExposureLevel::High),
            record("middle", ExposureLevel::Low),
            record("deep", ExposureLevel::Low),
        ];
        let edges = vec![
            DependencyEdge {
                source: "middle".to_string(),
                target: "edge".to_string(),
            },
            DependencyEdge {
                source: "deep".to_string(),
                target: "middle".to_string(),
            },
        ];

        let records = DependencyAnalyzer::new().propagate(records, &edges);
        let middle = records.iter().find(|r| r.chart == "middle").unwrap();
        let deep = records.iter().find(|r| r.chart == "deep").unwrap();
        assert_eq!(middle.exposure_level, ExposureLevel::Medium);
        // Two hops out from the exposed chart: stays internal.
        assert_eq!(deep.exposure_level, ExposureLevel::Low);
        assert_eq!(deep.gateway_type, GatewayType::Internal);
    }

    #[test]
    fn test_propagation_idempotent() {
        let records = vec![
            record("gateway", ExposureLevel::High),
            record("backend", ExposureLevel::Low),
        ];
        let edges = vec![DependencyEdge {
            source: "backend".to_string(),
            target: "gateway".to_string(),
        }];

        let analyzer = DependencyAnalyzer::new();
        let once = analyzer.propagate(records, &edges);
        let twice = analyzer.propagate(once.clone(), &edges);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_mixed_level_chart_not_upgraded() {
        // A chart with any non-LOW record keeps all its records untouched.
        let mut records = vec![
            record("gateway", ExposureLevel::High),
            record("partial", ExposureLevel::High),
            record("partial", ExposureLevel::Low),
        ];
        records[2].name = "partial-extra-container".to_string();
        let edges = vec![DependencyEdge {
            source: "partial".to_string(),
            target: "gateway".to_string(),
        }];

        let records = DependencyAnalyzer::new().propagate(records, &edges);
        let low = records
            .iter()
            .find(|r| r.name == "partial-extra-container")
            .unwrap();
        assert_eq!(low.exposure_level, ExposureLevel::Low);
    }
}
