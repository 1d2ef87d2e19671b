//! Mermaid diagram rendering.
//!
//! Renders the consolidated container set as a `graph TD` diagram: one outer
//! group with three nested exposure tiers, an `Internet` node feeding every
//! HIGH container, and one edge per transitive-exposure hint.

use std::collections::{BTreeMap, HashSet};

use crate::scanner::types::{ContainerRecord, ExposureLevel};

#[derive(Debug, Default)]
pub struct MermaidBuilder;

impl MermaidBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render the diagram text for a container set.
    pub fn build_diagram(&self, containers: &[ContainerRecord]) -> String {
        if containers.is_empty() {
            return "graph TD\n    empty[\"No containers found\"]\n".to_string();
        }

        let mut out = String::new();
        out.push_str("graph TD\n");
        out.push_str("    Internet((Internet))\n\n");

        out.push_str("    subgraph Exposure_Levels\n");
        let tiers = [
            ("High_Exposure", ExposureLevel::High),
            ("Medium_Exposure", ExposureLevel::Medium),
            ("Low_Exposure", ExposureLevel::Low),
        ];
        for (title, level) in tiers {
            out.push_str(&format!("        subgraph {}\n", title));
            for container in containers.iter().filter(|c| c.exposure_level == level) {
                out.push_str(&format!(
                    "            {}[\"{}\"]\n",
                    node_id(&container.name),
                    container.name
                ));
            }
            out.push_str("        end\n");
        }
        out.push_str("    end\n\n");

        for container in containers
            .iter()
            .filter(|c| c.exposure_level == ExposureLevel::High)
        {
            out.push_str(&format!("    Internet --> {}\n", node_id(&container.name)));
        }

        for (source, target) in self.exposure_edges(containers) {
            out.push_str(&format!("    {} --> {}\n", source, target));
        }

        out
    }

    /// Edges visualizing transitive exposure, one per `exposed_by` hint.
    ///
    /// A hint naming a chart resolves to that chart's container nodes; a
    /// hint naming a container node directly is used as-is.
    fn exposure_edges(&self, containers: &[ContainerRecord]) -> Vec<(String, String)> {
        let mut chart_nodes: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for container in containers {
            chart_nodes
                .entry(container.chart.as_str())
                .or_default()
                .push(container.name.as_str());
        }

        let mut edges = Vec::new();
        let mut seen = HashSet::new();
        for container in containers {
            for exposer in &container.exposed_by {
                let sources: Vec<&str> = match chart_nodes.get(exposer.as_str()) {
                    Some(nodes) => nodes.clone(),
                    None => vec![exposer.as_str()],
                };
                for source in sources {
                    let edge = (node_id(source), node_id(&container.name));
                    if edge.0 != edge.1 && seen.insert(edge.clone()) {
                        edges.push(edge);
                    }
                }
            }
        }
        edges
    }
}

/// Sanitize a container name into a mermaid node identifier.
fn node_id(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
