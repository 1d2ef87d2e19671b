//! Chart discovery.
//!
//! Walks a repository for directories directly containing a `Chart.yaml`
//! and packages each into a self-contained [`ChartUnit`]: parsed manifest,
//! base values, environment overlays, and associated Dockerfiles. A unit is
//! read once here and never mutated afterwards.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::config::types::ScanConfig;
use crate::scanner::parser::chart::{self, ChartManifest};
use crate::scanner::parser::values::{self, ValuesFile};

/// Matches environment overlay files: `values-prod.yaml`, `values.staging.yml`.
static OVERLAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^values[-.]([A-Za-z0-9_]+)\.ya?ml$").unwrap());

/// One discovered Helm chart and everything the analyzers need from it.
#[derive(Debug, Clone)]
pub struct ChartUnit {
    /// Chart name from the manifest, falling back to the directory name.
    pub name: String,
    /// Directory containing the chart manifest.
    pub dir: PathBuf,
    /// Parsed Chart.yaml (defaulted when malformed).
    pub manifest: ChartManifest,
    /// Parsed base values.yaml (empty when missing or malformed).
    pub base_values: ValuesFile,
    /// Environment overlays as `(env name, raw overlay values)`, sorted by
    /// environment name.
    pub overlays: Vec<(String, ValuesFile)>,
    /// Dockerfiles associated with this chart, sorted.
    pub dockerfiles: Vec<PathBuf>,
}

impl ChartUnit {
    /// All environments to evaluate, base first as `default`, each overlay
    /// deep-merged over the base values.
    pub fn environments(&self) -> Vec<(String, ValuesFile)> {
        let mut environments = vec![("default".to_string(), self.base_values.clone())];
        for (env, overlay) in &self.overlays {
            environments.push((env.clone(), self.base_values.merged_with(overlay)));
        }
        environments
    }

    /// Whether this chart carries environment overlays.
    pub fn has_multiple_environments(&self) -> bool {
        !self.overlays.is_empty()
    }
}

/// Discover every chart unit under `repo_path`, in stable path order.
pub fn discover_charts(repo_path: &Path, config: &ScanConfig) -> Vec<ChartUnit> {
    let mut chart_dirs: Vec<PathBuf> = WalkDir::new(repo_path)
        .max_depth(config.max_depth)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.file_name(), config))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == "Chart.yaml")
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect();
    chart_dirs.sort();
    chart_dirs.dedup();

    chart_dirs
        .iter()
        .map(|dir| load_chart_unit(repo_path, dir))
        .collect()
}

fn is_excluded(name: &std::ffi::OsStr, config: &ScanConfig) -> bool {
    let name = name.to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    config.exclude_dirs.iter().any(|excluded| *excluded == name)
}

/// Load one chart unit. Parse failures degrade the unit instead of failing:
/// a broken manifest keeps the directory name, broken values read as empty.
fn load_chart_unit(repo_path: &Path, dir: &Path) -> ChartUnit {
    let manifest = match chart::parse_chart_yaml_file(&dir.join("Chart.yaml")) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("{}: unparsable Chart.yaml ({}), using defaults", dir.display(), e);
            ChartManifest::default()
        }
    };

    let name = if manifest.name.trim().is_empty() {
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed-chart".to_string())
    } else {
        manifest.name.trim().to_string()
    };

    let values_path = dir.join("values.yaml");
    let base_values = if values_path.is_file() {
        match values::parse_values_yaml_file(&values_path) {
            Ok(values) => values,
            Err(e) => {
                warn!("{}: unparsable values.yaml ({}), treating as empty", dir.display(), e);
                ValuesFile::empty()
            }
        }
    } else {
        ValuesFile::empty()
    };

    let overlays = load_overlays(dir);
    let dockerfiles = collect_dockerfiles(repo_path, dir, &name);
    debug!(
        "chart {} at {}: {} environment overlay(s), {} dockerfile(s)",
        name,
        dir.display(),
        overlays.len(),
        dockerfiles.len()
    );

    ChartUnit {
        name,
        dir: dir.to_path_buf(),
        manifest,
        base_values,
        overlays,
        dockerfiles,
    }
}

fn load_overlays(dir: &Path) -> Vec<(String, ValuesFile)> {
    let mut overlays = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return overlays;
    };

    for entry in entries.flatten() {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(captures) = OVERLAY_RE.captures(&file_name) else {
            continue;
        };
        let env = captures[1].to_string();
        match values::parse_values_yaml_file(&entry.path()) {
            Ok(values) => overlays.push((env, values)),
            Err(e) => {
                warn!("{}: unparsable overlay ({}), skipping", entry.path().display(), e);
            }
        }
    }

    overlays.sort_by(|a, b| a.0.cmp(&b.0));
    overlays
}

/// Dockerfiles for a chart: anything dockerfile-like inside the chart
/// directory, plus `<repo>/dockerfiles/` entries matching the chart name,
/// plus anything under `<repo>/apps/<chart>/`.
fn collect_dockerfiles(repo_path: &Path, chart_dir: &Path, chart_name: &str) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();

    collect_dockerfiles_under(chart_dir, &mut |_| true, &mut found);

    let dockerfiles_dir = repo_path.join("dockerfiles");
    if dockerfiles_dir.is_dir() {
        collect_dockerfiles_under(
            &dockerfiles_dir,
            &mut |path| {
                let file_matches = path
                    .file_name()
                    .map(|n| n.to_string_lossy().contains(chart_name))
                    .unwrap_or(false);
                let parent_matches = path
                    .parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().contains(chart_name))
                    .unwrap_or(false);
                file_matches || parent_matches
            },
            &mut found,
        );
    }

    let app_dir = repo_path.join("apps").join(chart_name);
    if app_dir.is_dir() {
        collect_dockerfiles_under(&app_dir, &mut |_| true, &mut found);
    }

    found.into_iter().collect()
}

fn collect_dockerfiles_under(
    dir: &Path,
    accept: &mut dyn FnMut(&Path) -> bool,
    found: &mut BTreeSet<PathBuf>,
) {
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let is_dockerfile = entry
            .file_name()
            .to_string_lossy()
            .to_ascii_lowercase()
            .starts_with("dockerfile");
        if is_dockerfile && accept(entry.path()) {
            found.insert(entry.path().to_path_buf());
        }
    }
}
