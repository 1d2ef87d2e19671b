//! Consolidation of records and paths into the final topology.
//!
//! Builds the `master_paths` index (chart -> consolidated source paths +
//! most-exposed representative) and the three-way network topology
//! partition. This is the mapping a vulnerability-triage consumer uses to
//! re-score a code-level finding by its network context.

use std::collections::BTreeMap;

use crate::scanner::types::{
    ContainerRecord, ExposureLevel, MasterPathEntry, NetworkTopology,
};

#[derive(Debug, Default)]
pub struct PathConsolidator;

impl PathConsolidator {
    pub fn new() -> Self {
        Self
    }

    /// Highest exposure level among `records` (HIGH > MEDIUM > LOW).
    pub fn highest_exposure_level(&self, records: &[&ContainerRecord]) -> ExposureLevel {
        records
            .iter()
            .map(|r| r.exposure_level)
            .max()
            .unwrap_or_default()
    }

    /// The record with the maximum exposure score; ties break to the
    /// first-encountered record.
    pub fn most_exposed_container<'a>(
        &self,
        records: &[&'a ContainerRecord],
    ) -> Option<&'a ContainerRecord> {
        let mut best: Option<&'a ContainerRecord> = None;
        for &record in records {
            match best {
                Some(current) if record.exposure_score <= current.exposure_score => {}
                _ => best = Some(record),
            }
        }
        best
    }

    /// Build the per-chart `master_paths` index, keyed by chart name.
    pub fn build_master_paths(
        &self,
        records: &[ContainerRecord],
        source_paths: &BTreeMap<String, Vec<String>>,
    ) -> BTreeMap<String, MasterPathEntry> {
        let mut by_chart: BTreeMap<&str, Vec<&ContainerRecord>> = BTreeMap::new();
        for record in records {
            by_chart.entry(record.chart.as_str()).or_default().push(record);
        }

        let mut master_paths = BTreeMap::new();
        for (chart, chart_records) in by_chart {
            let Some(most_exposed) = self.most_exposed_container(&chart_records) else {
                continue;
            };
            master_paths.insert(
                chart.to_string(),
                MasterPathEntry {
                    source_paths: source_paths.get(chart).cloned().unwrap_or_default(),
                    exposure_level: self.highest_exposure_level(&chart_records),
                    most_exposed_container: most_exposed.clone(),
                },
            );
        }
        master_paths
    }

    /// Partition container names into the three topology buckets, strictly
    /// by each record's own level.
    pub fn build_network_topology(&self, records: &[ContainerRecord]) -> NetworkTopology {
        let mut topology = NetworkTopology::default();
        for record in records {
            let bucket = match record.exposure_level {
                ExposureLevel::High => &mut topology.exposed_containers,
                ExposureLevel::Medium => &mut topology.linked_containers,
                ExposureLevel::Low => &mut topology.internal_containers,
            };
            bucket.push(record.name.clone());
        }
        topology
    }
}
