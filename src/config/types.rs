use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker-pool size for per-chart analysis; 0 means one per CPU core,
    /// capped at 8.
    pub worker_threads: usize,
    /// Maximum directory depth during chart discovery.
    pub max_depth: usize,
    /// Directory names skipped during chart discovery.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            max_depth: 16,
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl ScanConfig {
    /// Resolve the configured worker count to a concrete pool size.
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get().min(8)
        } else {
            self.worker_threads
        }
    }
}

fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", "target", "vendor", "dist", "build"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
