//! Property tests for source-path consolidation and the topology partition.

use proptest::prelude::*;

use chartscope_cli::scanner::{
    ContainerRecord, DockerfileAnalyzer, ExposureLevel, GatewayType, PathConsolidator,
};

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

fn raw_path() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::collection::vec(segment(), 1..4).prop_map(|segs| segs.join("/")),
        1 => Just(".".to_string()),
    ]
}

proptest! {
    #[test]
    fn consolidation_output_has_no_strict_descendants(
        raw in prop::collection::vec(raw_path(), 0..12)
    ) {
        let analyzer = DockerfileAnalyzer::new();
        let consolidated = analyzer.consolidate_source_paths(&raw);

        for a in &consolidated {
            for b in &consolidated {
                if a != b {
                    prop_assert!(
                        !a.starts_with(b.as_str()),
                        "{} is a descendant of retained {}",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn consolidation_is_a_fixed_point(
        raw in prop::collection::vec(raw_path(), 0..12)
    ) {
        let analyzer = DockerfileAnalyzer::new();
        let once = analyzer.consolidate_source_paths(&raw);
        let twice = analyzer.consolidate_source_paths(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dot_always_collapses_to_repo_root(
        mut raw in prop::collection::vec(raw_path(), 0..8)
    ) {
        raw.push(".".to_string());
        let analyzer = DockerfileAnalyzer::new();
        prop_assert_eq!(
            analyzer.consolidate_source_paths(&raw),
            vec!["./".to_string()]
        );
    }

    #[test]
    fn topology_partition_covers_every_record(
        levels in prop::collection::vec(0u8..3, 0..20)
    ) {
        let records: Vec<ContainerRecord> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let level = ExposureLevel::from_score(l + 1).unwrap();
                ContainerRecord {
                    name: format!("container-{}", i),
                    chart: format!("chart-{}", i),
                    environment: "default".to_string(),
                    gateway_type: GatewayType::Internal,
                    host: None,
                    exposure_score: level.score(),
                    exposure_level: level,
                    access_chain: vec![format!("chart-{}", i)],
                    exposed_by: Vec::new(),
                }
            })
            .collect();

        let topology = PathConsolidator::new().build_network_topology(&records);
        prop_assert_eq!(topology.len(), records.len());

        // Pairwise disjoint: every name lands in exactly one bucket.
        let mut all: Vec<&String> = topology
            .exposed_containers
            .iter()
            .chain(topology.linked_containers.iter())
            .chain(topology.internal_containers.iter())
            .collect();
        all.sort();
        all.dedup();
        prop_assert_eq!(all.len(), records.len());
    }
}
