//! Integration tests for snapshot files, collectors and narratives

use optimizer_lib::inventory::snapshot_from_str;
use optimizer_lib::narrative::{render_ai_report, suggest_blueprint, HardwareNode, MockNarrator};
use optimizer_lib::{CollectorRegistry, CostEstimator, HeuristicConsolidator, InventorySnapshot, PowerEstimator};
use serde_json::{json, Map};
use std::fs;
use tempfile::TempDir;

fn collect_to_file(dir: &TempDir, source: &str) -> InventorySnapshot {
    let collector = CollectorRegistry::with_builtin().create(source, None).unwrap();
    let snapshot = collector.collect().unwrap();

    let path = dir.path().join(format!("{source}.json"));
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
    snapshot_from_str(&fs::read_to_string(&path).unwrap()).unwrap()
}

#[test]
fn test_written_snapshot_reloads_unchanged() {
    let dir = TempDir::new().unwrap();
    for source in ["proxmox", "libvirt", "docker", "k8s"] {
        let collector = CollectorRegistry::with_builtin().create(source, None).unwrap();
        let snapshot = collector.collect().unwrap();

        let path = dir.path().join("snapshot.json");
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();
        let reloaded = snapshot_from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(reloaded, snapshot, "source {source}");
    }
}

#[test]
fn test_simulated_proxmox_estimate() {
    let dir = TempDir::new().unwrap();
    let snapshot = collect_to_file(&dir, "proxmox");

    let power = PowerEstimator::new().estimate(&snapshot);
    // 85 + 2 * 0.2 * 9 + 2 * 0.2 * 0.4
    assert_eq!(power.node_watts("pve-1"), Some(88.76));

    let cost = CostEstimator::new(0.2).estimate(&power);
    assert_eq!(cost.nodes.len(), 1);
    assert_eq!(cost.currency(), "USD");
}

#[test]
fn test_fixture_file_through_collector() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixture.json");
    fs::write(
        &path,
        json!({
            "nodes": [
                {"name": "big", "cpu_cores": 16, "memory_gb": 64},
                {"name": "small", "cpu_cores": "4", "memory_gb": 8.9}
            ],
            "workloads": [
                {"name": "web", "cpu_cores": 1, "memory_gb": 2, "utilization": 0.1, "node_name": "small"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let dataset = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let collector = CollectorRegistry::with_builtin().create("Docker", Some(dataset)).unwrap();
    let snapshot = collector.collect().unwrap();

    assert_eq!(snapshot.metadata.get("source").map(String::as_str), Some("docker"));
    assert_eq!(snapshot.node_by_name("small").unwrap().capacity(), (4, 8));

    let plan = HeuristicConsolidator::default().consolidate(&snapshot);
    assert_eq!(plan.assignments.get("web").map(String::as_str), Some("big"));
    assert_eq!(plan.nodes_to_power_down, vec!["small".to_string()]);
}

#[test]
fn test_narratives_from_mock_provider() {
    let dir = TempDir::new().unwrap();
    let snapshot = collect_to_file(&dir, "libvirt");
    let power = PowerEstimator::new().estimate(&snapshot);
    let cost = CostEstimator::new(0.3).estimate(&power);

    let text = render_ai_report(&power, &cost, "consolidate-low-util", 12.5, &MockNarrator).unwrap();
    assert!(text.starts_with("Scenario 'consolidate-low-util' could save approximately 12.50"));

    let hardware = vec![
        HardwareNode {
            name: "a".to_string(),
            cpu_cores: 8,
            memory_gb: 32,
            storage_tb: 1.0,
        },
        HardwareNode {
            name: "b".to_string(),
            cpu_cores: 4,
            memory_gb: 16,
            storage_tb: 0.5,
        },
    ];
    let blueprint = suggest_blueprint("k3s", &hardware, &Map::new(), &MockNarrator).unwrap();
    assert_eq!(
        blueprint.summary,
        "Baseline for k3s: 2 nodes, 12 cores, 48 GB RAM, 1.5 TB storage; no additional constraints."
    );
    assert!(blueprint.ai_notes.unwrap().contains("plan around 2 nodes"));
}
