use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use log::info;

use crate::cli::ScanOutputFormat;
use crate::config::types::Config;
use crate::scanner::{ExposureLevel, ExposureScanner, ScanResult};

pub fn handle_scan(
    path: PathBuf,
    format: ScanOutputFormat,
    output: Option<PathBuf>,
    config: &Config,
) -> crate::Result<()> {
    let scanner = ExposureScanner::with_config(config.scan.clone());
    let result = scanner.scan(&path)?;

    let rendered = match format {
        ScanOutputFormat::Json => serde_json::to_string_pretty(&result)?,
        ScanOutputFormat::Console => format_console(&result),
        ScanOutputFormat::Paths => format_paths(&result),
    };

    match output {
        Some(target) => {
            fs::write(&target, rendered + "\n")?;
            info!("scan result written to {}", target.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn level_badge(level: ExposureLevel) -> colored::ColoredString {
    match level {
        ExposureLevel::High => level.as_str().red().bold(),
        ExposureLevel::Medium => level.as_str().yellow().bold(),
        ExposureLevel::Low => level.as_str().green(),
    }
}

fn format_console(result: &ScanResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "🔍 HELM EXPOSURE SCAN".bright_cyan().bold()));
    out.push_str(&format!("Repository: {}\n\n", result.repo_path));

    let summary = &result.scan_summary;
    if let Some(error) = &summary.error {
        out.push_str(&format!("{} {}\n", "⚠".yellow(), error));
        return out;
    }

    out.push_str(&format!("{}\n", "Summary".bold()));
    out.push_str(&format!("  Charts analyzed:  {}\n", summary.charts_analyzed));
    out.push_str(&format!(
        "  Containers:       {} ({} high / {} medium / {} low)\n\n",
        summary.total_containers,
        summary.high_exposure.to_string().red(),
        summary.medium_exposure.to_string().yellow(),
        summary.low_exposure.to_string().green(),
    ));

    out.push_str(&format!("{}\n", "Containers".bold()));
    for container in &result.containers {
        out.push_str(&format!(
            "  [{}] {} ({})",
            level_badge(container.exposure_level),
            container.name,
            container.gateway_type,
        ));
        if let Some(host) = &container.host {
            out.push_str(&format!(" host={}", host));
        }
        if container.access_chain.len() > 1 {
            out.push_str(&format!(" via {}", container.access_chain.join(" -> ")));
        }
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", "Network topology".bold()));
    let topology = &result.network_topology;
    let buckets = [
        ("exposed", &topology.exposed_containers),
        ("linked", &topology.linked_containers),
        ("internal", &topology.internal_containers),
    ];
    for (label, names) in buckets {
        out.push_str(&format!("  {:<9} {}\n", label, names.join(", ")));
    }

    out
}

fn format_paths(result: &ScanResult) -> String {
    let mut out = String::new();
    if let Some(error) = &result.scan_summary.error {
        out.push_str(&format!("{}\n", error));
        return out;
    }

    for (chart, entry) in &result.master_paths {
        out.push_str(&format!(
            "{} [{} {}]\n",
            chart.bold(),
            level_badge(entry.exposure_level),
            entry.most_exposed_container.exposure_score,
        ));
        for path in &entry.source_paths {
            out.push_str(&format!("  {}\n", path));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::scanner::{ContainerRecord, GatewayType, MasterPathEntry, NetworkTopology, ScanSummary};

    fn sample_result() -> ScanResult {
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
        let mut master_paths = BTreeMap::new();
        master_paths.insert(
            "web".to_string(),
            MasterPathEntry {
                source_paths: vec!["src/".to_string()],
                exposure_level: ExposureLevel::High,
                most_exposed_container: record.clone(),
            },
        );
        ScanResult {
            repo_path: "/repo".to_string(),
            scan_summary: ScanSummary {
                total_containers: 1,
                high_exposure: 1,
                medium_exposure: 0,
                low_exposure: 0,
                charts_analyzed: 1,
                error: None,
            },
            containers: vec![record],
            master_paths,
            network_topology: NetworkTopology {
                exposed_containers: vec!["web-container".to_string()],
                linked_containers: Vec::new(),
                internal_containers: Vec::new(),
            },
            mermaid_diagram: "graph TD\n".to_string(),
        }
    }

    #[test]
    fn test_console_output_lists_containers() {
        let out = format_console(&sample_result());
        assert!(out.contains("web-container"));
        assert!(out.contains("host=web.example.com"));
        assert!(out.contains("Charts analyzed:  1"));
    }

    #[test]
    fn test_paths_output_lists_source_paths() {
        let out = format_paths(&sample_result());
        assert!(out.contains("web"));
        assert!(out.contains("  src/"));
    }
}
