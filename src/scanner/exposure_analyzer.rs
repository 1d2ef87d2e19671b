//! Per-chart exposure classification.
//!
//! Evaluates each chart environment against the evidence rules and emits one
//! container record per detection. Records start with a single-element
//! access chain; the dependency analyzer may extend it later.

use log::debug;

use crate::scanner::discovery::ChartUnit;
use crate::scanner::evidence::{self, ExposureEvidence};
use crate::scanner::types::{ContainerRecord, ExposureLevel, GatewayType};

#[derive(Debug, Default)]
pub struct ExposureAnalyzer;

impl ExposureAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classify every environment of one chart.
    ///
    /// Multiple ingress hosts fan out into one record per host; everything
    /// else yields exactly one record per environment.
    pub fn analyze_chart(&self, chart: &ChartUnit) -> Vec<ContainerRecord> {
        let environments = chart.environments();
        let multi_env = environments.len() > 1;
        let mut records = Vec::new();

        for (env, values) in &environments {
            match evidence::classify(values) {
                ExposureEvidence::Ingress { hosts, nginx_class } => {
                    let gateway = if nginx_class {
                        GatewayType::Nginx
                    } else {
                        GatewayType::Ingress
                    };
                    debug!(
                        "{} [{}]: ingress with {} host(s), gateway {}",
                        chart.name,
                        env,
                        hosts.len(),
                        gateway
                    );
                    for host in hosts {
                        records.push(self.record(
                            chart,
                            env,
                            multi_env,
                            gateway,
                            Some(host),
                            ExposureLevel::High,
                        ));
                    }
                }
                ExposureEvidence::Service { kind } => {
                    debug!("{} [{}]: exposed service type {:?}", chart.name, env, kind);
                    records.push(self.record(
                        chart,
                        env,
                        multi_env,
                        GatewayType::LoadBalancerNodePort,
                        None,
                        ExposureLevel::High,
                    ));
                }
                ExposureEvidence::Absent => {
                    debug!("{} [{}]: no direct exposure evidence", chart.name, env);
                    records.push(self.record(
                        chart,
                        env,
                        multi_env,
                        GatewayType::Internal,
                        None,
                        ExposureLevel::Low,
                    ));
                }
            }
        }

        records
    }

    fn record(
        &self,
        chart: &ChartUnit,
        env: &str,
        multi_env: bool,
        gateway_type: GatewayType,
        host: Option<String>,
        level: ExposureLevel,
    ) -> ContainerRecord {
        ContainerRecord {
            name: container_name(&chart.name, env, multi_env),
            chart: chart.name.clone(),
            environment: env.to_string(),
            gateway_type,
            host,
            exposure_score: level.score(),
            exposure_level: level,
            access_chain: vec![chart.name.clone()],
            exposed_by: Vec::new(),
        }
    }
}

fn container_name(chart: &str, env: &str, multi_env: bool) -> String {
    if multi_env {
        format!("{}-{}-container", chart, env)
    } else {
        format!("{}-container", chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::parser::chart::ChartManifest;
    use crate::scanner::parser::values::parse_values_yaml;

    fn unit(name: &str, base: &str, overlays: &[(&str, &str)]) -> ChartUnit {
        ChartUnit {
            name: name.to_string(),
            dir: std::path::PathBuf::from(format!("/tmp/{}", name)),
            manifest: ChartManifest::default(),
            base_values: parse_values_yaml(base).unwrap(),
            overlays: overlays
                .iter()
                .map(|(env, yaml)| (env.to_string(), parse_values_yaml(yaml).unwrap()))
                .collect(),
            dockerfiles: Vec::new(),
        }
    }

    #[test]
    fn test_single_env_ingress() {
        let chart = unit(
            "web",
            r#"
ingress:
  enabled: true
  hosts:
    - host: test.example.com
"#,
            &[],
        );
        let records = ExposureAnalyzer::new().analyze_chart(&chart);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "web-container");
        assert_eq!(record.environment, "default");
        assert_eq!(record.exposure_level, ExposureLevel::High);
        assert_eq!(record.exposure_score, 3);
        assert_eq!(record.gateway_type, GatewayType::Ingress);
        assert_eq!(record.host.as_deref(), Some("test.example.com"));
        assert_eq!(record.access_chain, vec!["web"]);
    }

    #[test]
    fn test_multi_host_fan_out() {
        let chart = unit(
            "edge",
            r#"
ingress:
  enabled: true
  hosts:
    - host: a.example.com
    - host: b.example.com
"#,
            &[],
        );
        let records = ExposureAnalyzer::new().analyze_chart(&chart);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].host.as_deref(), Some("a.example.com"));
        assert_eq!(records[1].host.as_deref(), Some("b.example.com"));
    }

    #[test]
    fn test_multi_environment_names() {
        let chart = unit(
            "svc",
            "ingress:\n  enabled: false\n",
            &[(
                "prod",
                r#"
ingress:
  enabled: true
  hosts:
    - host: svc.example.com
"#,
            )],
        );
        let records = ExposureAnalyzer::new().analyze_chart(&chart);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name, "svc-default-container");
        assert_eq!(records[0].exposure_level, ExposureLevel::Low);
        assert_eq!(records[0].gateway_type, GatewayType::Internal);

        assert_eq!(records[1].name, "svc-prod-container");
        assert_eq!(records[1].exposure_level, ExposureLevel::High);
    }

    #[test]
    fn test_service_type_rule() {
        let chart = unit("lb", "service:\n  type: LoadBalancer\n", &[]);
        let records = ExposureAnalyzer::new().analyze_chart(&chart);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gateway_type, GatewayType::LoadBalancerNodePort);
        assert_eq!(records[0].exposure_level, ExposureLevel::High);
        assert_eq!(records[0].host, None);
    }

    #[test]
    fn test_no_evidence_defaults_internal() {
        let chart = unit("db", "replicaCount: 1\n", &[]);
        let records = ExposureAnalyzer::new().analyze_chart(&chart);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].exposure_level, ExposureLevel::Low);
        assert_eq!(records[0].exposure_score, 1);
        assert_eq!(records[0].gateway_type, GatewayType::Internal);
    }
}
