//! Fixture-backed platform adapters
//!
//! Each adapter normalizes an already-structured dataset. Without a
//! dataset it reports a small simulated inventory for its platform.

use super::{Collector, CollectorError};
use crate::inventory::build_snapshot;
use crate::models::InventorySnapshot;
use serde_json::{json, Value};

/// Collector for one platform (proxmox, libvirt, docker, kubernetes)
#[derive(Debug, Clone)]
pub struct PlatformCollector {
    source: &'static str,
    dataset: Option<Value>,
    simulate: fn() -> Value,
}

impl PlatformCollector {
    pub fn new(source: &'static str, dataset: Option<Value>, simulate: fn() -> Value) -> Self {
        Self {
            source,
            dataset,
            simulate,
        }
    }

    pub fn proxmox(dataset: Option<Value>) -> Self {
        Self::new("proxmox", dataset, simulated_proxmox)
    }

    pub fn libvirt(dataset: Option<Value>) -> Self {
        Self::new("libvirt", dataset, simulated_libvirt)
    }

    pub fn docker(dataset: Option<Value>) -> Self {
        Self::new("docker", dataset, simulated_docker)
    }

    pub fn kubernetes(dataset: Option<Value>) -> Self {
        Self::new("kubernetes", dataset, simulated_kubernetes)
    }

    /// True when no usable fixture was supplied
    pub fn is_simulated(&self) -> bool {
        self.fixture().is_none()
    }

    fn fixture(&self) -> Option<&Value> {
        self.dataset.as_ref().filter(|value| !is_empty_record(value))
    }
}

impl Collector for PlatformCollector {
    fn source(&self) -> &str {
        self.source
    }

    fn collect(&self) -> Result<InventorySnapshot, CollectorError> {
        let mut snapshot = match self.fixture() {
            Some(dataset) => build_snapshot(dataset)?,
            None => build_snapshot(&(self.simulate)())?,
        };

        snapshot
            .metadata
            .entry("source".to_string())
            .or_insert_with(|| self.source.to_string());
        snapshot
            .metadata
            .entry("collected_at".to_string())
            .or_insert_with(|| chrono::Utc::now().to_rfc3339());

        tracing::info!(
            source = self.source,
            simulated = self.is_simulated(),
            nodes = snapshot.nodes.len(),
            workloads = snapshot.workloads.len(),
            "Collected inventory"
        );

        Ok(snapshot)
    }
}

fn is_empty_record(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Single Proxmox VE host running a router VM
pub fn simulated_proxmox() -> Value {
    json!({
        "metadata": {"source": "proxmox", "note": "simulated"},
        "nodes": [{
            "name": "pve-1",
            "kind": "proxmox",
            "cpu_cores": 16,
            "memory_gb": 64,
            "power_profile": {
                "base_idle_watts": 85,
                "watts_per_cpu_core": 9,
                "watts_per_gb_ram": 0.4
            }
        }],
        "workloads": [{
            "name": "router",
            "workload_type": "vm",
            "cpu_cores": 2,
            "memory_gb": 2,
            "utilization": 0.2,
            "node_name": "pve-1"
        }]
    })
}

/// Two KVM hosts managed through libvirt
pub fn simulated_libvirt() -> Value {
    json!({
        "metadata": {"source": "libvirt", "note": "simulated"},
        "nodes": [
            {
                "name": "kvm-1",
                "kind": "libvirt",
                "cpu_cores": 12,
                "memory_gb": 48,
                "power_profile": {"base_idle_watts": 75}
            },
            {
                "name": "kvm-2",
                "kind": "libvirt",
                "cpu_cores": 8,
                "memory_gb": 32,
                "power_profile": {"base_idle_watts": 55}
            }
        ],
        "workloads": [
            {
                "name": "nas",
                "workload_type": "vm",
                "cpu_cores": 2,
                "memory_gb": 8,
                "utilization": 0.3,
                "node_name": "kvm-1"
            },
            {
                "name": "media",
                "workload_type": "vm",
                "cpu_cores": 4,
                "memory_gb": 8,
                "utilization": 0.15,
                "node_name": "kvm-2"
            }
        ]
    })
}

/// One Docker host with a web and a worker container
pub fn simulated_docker() -> Value {
    json!({
        "metadata": {"source": "docker", "note": "simulated"},
        "nodes": [{
            "name": "docker-host",
            "kind": "docker",
            "cpu_cores": 8,
            "memory_gb": 32,
            "power_profile": {"base_idle_watts": 70}
        }],
        "workloads": [
            {
                "name": "web",
                "workload_type": "container",
                "cpu_cores": 1,
                "memory_gb": 0.5,
                "utilization": 0.5,
                "node_name": "docker-host"
            },
            {
                "name": "worker",
                "workload_type": "container",
                "cpu_cores": 2,
                "memory_gb": 1,
                "utilization": 0.4,
                "node_name": "docker-host"
            }
        ]
    })
}

/// Two-node k3s cluster with one pod per node
pub fn simulated_kubernetes() -> Value {
    json!({
        "metadata": {"source": "kubernetes", "note": "simulated"},
        "nodes": [
            {"name": "k3s-master", "kind": "k8s", "cpu_cores": 4, "memory_gb": 16},
            {"name": "k3s-agent-1", "kind": "k8s", "cpu_cores": 4, "memory_gb": 16}
        ],
        "workloads": [
            {
                "name": "api",
                "workload_type": "pod",
                "cpu_cores": 1,
                "memory_gb": 1,
                "utilization": 0.6,
                "node_name": "k3s-master"
            },
            {
                "name": "runner",
                "workload_type": "pod",
                "cpu_cores": 0.5,
                "memory_gb": 0.5,
                "utilization": 0.4,
                "node_name": "k3s-agent-1"
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxmox_collector_returns_snapshot() {
        let collector = PlatformCollector::proxmox(Some(json!({
            "nodes": [{"name": "n1", "kind": "proxmox", "cpu_cores": 8, "memory_gb": 32}],
            "workloads": [{
                "name": "vm1",
                "workload_type": "vm",
                "cpu_cores": 2,
                "memory_gb": 4,
                "utilization": 0.5,
                "node_name": "n1"
            }]
        })));

        assert!(!collector.is_simulated());
        let snapshot = collector.collect().unwrap();
        assert_eq!(snapshot.nodes[0].name, "n1");
        assert_eq!(snapshot.workloads[0].name, "vm1");
        assert_eq!(snapshot.metadata["source"], "proxmox");
        assert!(snapshot.metadata.contains_key("collected_at"));
    }

    #[test]
    fn test_docker_collector_simulation_has_containers() {
        let collector = PlatformCollector::docker(None);
        assert!(collector.is_simulated());

        let snapshot = collector.collect().unwrap();
        assert!(!snapshot.workloads.is_empty(), "Expected simulated docker workloads");
        assert!(snapshot.workloads.iter().all(|w| w.workload_type == "container"));
        assert_eq!(snapshot.metadata["note"], "simulated");
    }

    #[test]
    fn test_empty_fixture_falls_back_to_simulation() {
        let collector = PlatformCollector::kubernetes(Some(json!({})));
        assert!(collector.is_simulated());
        assert_eq!(collector.collect().unwrap().nodes.len(), 2);
    }

    #[test]
    fn test_fixture_source_metadata_preserved() {
        let snapshot = PlatformCollector::libvirt(Some(json!({
            "metadata": {"source": "lab-export"},
            "nodes": [{"name": "h1"}]
        })))
        .collect()
        .unwrap();
        assert_eq!(snapshot.metadata["source"], "lab-export");
    }

    #[test]
    fn test_all_simulations_normalize() {
        for simulate in [simulated_proxmox, simulated_libvirt, simulated_docker, simulated_kubernetes] {
            let snapshot = build_snapshot(&simulate()).unwrap();
            assert!(!snapshot.nodes.is_empty());
            assert!(snapshot
                .workloads
                .iter()
                .all(|w| snapshot.node_by_name(&w.node_name).is_some()));
        }
    }
}
