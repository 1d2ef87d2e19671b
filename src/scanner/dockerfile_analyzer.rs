//! Source-path mapping from Dockerfiles.
//!
//! Extracts the source directories a chart's Dockerfiles copy into the image
//! and consolidates them into the minimal covering set used by the
//! `master_paths` index.

use std::fs;

use log::warn;

use crate::scanner::discovery::ChartUnit;
use crate::scanner::parser::dockerfile;

#[derive(Debug, Default)]
pub struct DockerfileAnalyzer;

impl DockerfileAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Consolidated source paths for one chart, across all its Dockerfiles.
    pub fn analyze_chart(&self, chart: &ChartUnit) -> Vec<String> {
        let mut raw = Vec::new();
        for path in &chart.dockerfiles {
            match fs::read_to_string(path) {
                Ok(content) => raw.extend(dockerfile::copy_sources(&content)),
                Err(e) => warn!("{}: unreadable Dockerfile ({})", path.display(), e),
            }
        }
        self.consolidate_source_paths(&raw)
    }

    /// Reduce raw copy paths to a minimal covering set of directory tokens.
    ///
    /// A literal `.` means the whole source tree is copied and collapses the
    /// result to exactly `["./"]`. Otherwise paths are normalized to a
    /// trailing-slash form and strict descendants of retained paths are
    /// dropped. Output is deduplicated and order-stable.
    pub fn consolidate_source_paths(&self, raw: &[String]) -> Vec<String> {
        if raw.iter().any(|p| p == "." || p == "./") {
            return vec!["./".to_string()];
        }

        let mut normalized: Vec<String> = Vec::new();
        for path in raw {
            let mut path = path.as_str();
            while let Some(stripped) = path.strip_prefix("./") {
                path = stripped;
            }
            let path = path.trim_matches('/');
            if path.is_empty() {
                continue;
            }
            let token = format!("{}/", path);
            if !normalized.contains(&token) {
                normalized.push(token);
            }
        }

        normalized
            .iter()
            .filter(|path| {
                !normalized
                    .iter()
                    .any(|other| *path != other && path.starts_with(other.as_str()))
            })
            .cloned()
            .collect()
    }
}
