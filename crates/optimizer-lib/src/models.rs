//! Core data models for the homelab optimizer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default idle draw of a node with no workload (watts)
pub const DEFAULT_BASE_IDLE_WATTS: f64 = 60.0;

/// Default marginal draw per fully utilized core (watts)
pub const DEFAULT_WATTS_PER_CPU_CORE: f64 = 8.0;

/// Default marginal draw per fully utilized GB of memory (watts)
pub const DEFAULT_WATTS_PER_GB_RAM: f64 = 0.5;

/// Static power coefficients of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerProfile {
    pub base_idle_watts: f64,
    pub watts_per_cpu_core: f64,
    pub watts_per_gb_ram: f64,
}

impl Default for PowerProfile {
    fn default() -> Self {
        Self {
            base_idle_watts: DEFAULT_BASE_IDLE_WATTS,
            watts_per_cpu_core: DEFAULT_WATTS_PER_CPU_CORE,
            watts_per_gb_ram: DEFAULT_WATTS_PER_GB_RAM,
        }
    }
}

impl PowerProfile {
    pub fn new(base_idle_watts: f64, watts_per_cpu_core: f64, watts_per_gb_ram: f64) -> Self {
        Self {
            base_idle_watts,
            watts_per_cpu_core,
            watts_per_gb_ram,
        }
    }

    /// Default coefficients with a custom idle draw
    pub fn with_idle_watts(base_idle_watts: f64) -> Self {
        Self {
            base_idle_watts,
            ..Self::default()
        }
    }
}

/// A physical or logical compute host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: String,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    #[serde(default)]
    pub power_profile: PowerProfile,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Node {
    /// Create a node with the default power profile and no metadata
    pub fn new(name: impl Into<String>, kind: impl Into<String>, cpu_cores: u32, memory_gb: u32) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            cpu_cores,
            memory_gb,
            power_profile: PowerProfile::default(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_power_profile(mut self, profile: PowerProfile) -> Self {
        self.power_profile = profile;
        self
    }

    /// Declared capacity as `(cpu_cores, memory_gb)`
    pub fn capacity(&self) -> (u32, u32) {
        (self.cpu_cores, self.memory_gb)
    }
}

/// A unit of demand placed on a node (VM, container, pod, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub name: String,
    pub workload_type: String,
    pub cpu_cores: f64,
    pub memory_gb: f64,
    pub utilization: f64,
    pub node_name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Workload {
    pub fn new(
        name: impl Into<String>,
        workload_type: impl Into<String>,
        cpu_cores: f64,
        memory_gb: f64,
        utilization: f64,
        node_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            workload_type: workload_type.into(),
            cpu_cores,
            memory_gb,
            utilization,
            node_name: node_name.into(),
            labels: BTreeMap::new(),
        }
    }
}

/// Immutable point-in-time view of nodes and workloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub workloads: Vec<Workload>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl InventorySnapshot {
    pub fn new(nodes: Vec<Node>, workloads: Vec<Workload>) -> Self {
        Self {
            nodes,
            workloads,
            metadata: BTreeMap::new(),
        }
    }

    /// First node with the given name
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Workloads whose `node_name` matches exactly
    pub fn workloads_on<'a>(&'a self, node_name: &'a str) -> impl Iterator<Item = &'a Workload> + 'a {
        self.workloads.iter().filter(move |w| w.node_name == node_name)
    }
}

/// Result of a consolidation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationPlan {
    /// Workload name to target node name, for every workload that could be placed
    pub assignments: BTreeMap<String, String>,
    /// Nodes left without any workload after the pass
    pub nodes_to_power_down: Vec<String>,
    pub estimated_idle_watt_reduction: f64,
}

impl ConsolidationPlan {
    /// Number of workloads placed on `node_name`
    pub fn assigned_count(&self, node_name: &str) -> usize {
        self.assignments.values().filter(|target| *target == node_name).count()
    }
}

/// Round to two decimal places
///
/// Rounds the exact binary value, sending exact ties to the even digit, so
/// `45.625` becomes `45.62` and `1.115` (stored as `1.11499...`) becomes `1.11`.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_profile_defaults() {
        let profile = PowerProfile::default();
        assert_eq!(profile.base_idle_watts, 60.0);
        assert_eq!(profile.watts_per_cpu_core, 8.0);
        assert_eq!(profile.watts_per_gb_ram, 0.5);
    }

    #[test]
    fn test_partial_power_profile_deserializes_with_defaults() {
        let profile: PowerProfile = serde_json::from_str(r#"{"base_idle_watts": 70}"#).unwrap();
        assert_eq!(profile.base_idle_watts, 70.0);
        assert_eq!(profile.watts_per_cpu_core, DEFAULT_WATTS_PER_CPU_CORE);
    }

    #[test]
    fn test_node_by_name() {
        let snapshot = InventorySnapshot::new(
            vec![Node::new("a", "proxmox", 4, 8), Node::new("b", "docker", 8, 16)],
            Vec::new(),
        );
        assert_eq!(snapshot.node_by_name("b").map(|n| n.cpu_cores), Some(8));
        assert!(snapshot.node_by_name("c").is_none());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = InventorySnapshot::new(
            vec![Node::new("n1", "proxmox", 8, 32)],
            vec![Workload::new("vm1", "vm", 2.0, 4.0, 0.5, "n1")],
        );
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["nodes"][0]["name"], "n1");
        assert_eq!(json["nodes"][0]["power_profile"]["base_idle_watts"], 60.0);
        assert_eq!(json["workloads"][0]["node_name"], "n1");
        assert!(json["metadata"].as_object().unwrap().is_empty());

        let back: InventorySnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(89.004), 89.0);
        assert_eq!(round2(18.0000001), 18.0);
        assert_eq!(round2(-1.234), -1.23);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(45.625), 45.62);
        assert_eq!(round2(60.125), 60.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-2.625), -2.62);
    }

    #[test]
    fn test_round2_uses_stored_value() {
        assert_eq!(round2(1.115), 1.11);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.005), 1.0);
    }
}
