//! Linear power model
//!
//! Each node draws its idle baseline plus a marginal term proportional to
//! the utilized cores and memory of the workloads placed on it.

use crate::models::{round2, InventorySnapshot, Node, Workload};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// Reserved key carrying the sum of all node estimates
pub const TOTAL_WATTS_KEY: &str = "total_watts";

/// Estimated draw of a single node
#[derive(Debug, Clone, PartialEq)]
pub struct NodePower {
    pub node: String,
    pub watts: f64,
}

/// Per-node power estimates plus their total
///
/// Serializes as a flat map `{"<node>": watts, ..., "total_watts": total}`.
/// A node literally named `total_watts` keeps its own entry here but is
/// shadowed by the total in the flattened form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerReport {
    pub nodes: Vec<NodePower>,
    pub total_watts: f64,
}

impl PowerReport {
    /// Map-style lookup: the reserved key yields the total
    pub fn get(&self, key: &str) -> Option<f64> {
        if key == TOTAL_WATTS_KEY {
            return Some(self.total_watts);
        }
        self.node_watts(key)
    }

    /// Estimate of a node, never the total
    pub fn node_watts(&self, node: &str) -> Option<f64> {
        self.nodes.iter().find(|entry| entry.node == node).map(|entry| entry.watts)
    }

    /// Node entries in snapshot order followed by the total
    pub fn iter(&self) -> PowerEntries<'_> {
        PowerEntries {
            nodes: self.nodes.iter(),
            total: Some(self.total_watts),
        }
    }
}

/// Iterator over `(key, watts)` pairs of a [`PowerReport`]
pub struct PowerEntries<'a> {
    nodes: std::slice::Iter<'a, NodePower>,
    total: Option<f64>,
}

impl<'a> Iterator for PowerEntries<'a> {
    type Item = (&'a str, f64);

    fn next(&mut self) -> Option<Self::Item> {
        match self.nodes.next() {
            Some(entry) => Some((entry.node.as_str(), entry.watts)),
            None => self.total.take().map(|total| (TOTAL_WATTS_KEY, total)),
        }
    }
}

impl<'a> IntoIterator for &'a PowerReport {
    type Item = (&'a str, f64);
    type IntoIter = PowerEntries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for PowerReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len() + 1))?;
        for (key, watts) in self.iter() {
            map.serialize_entry(key, &watts)?;
        }
        map.end()
    }
}

/// Estimates power draw per node from its profile and assigned workloads
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerEstimator;

impl PowerEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate every node of the snapshot
    ///
    /// Workloads whose `node_name` matches no node are ignored.
    pub fn estimate(&self, snapshot: &InventorySnapshot) -> PowerReport {
        let nodes: Vec<NodePower> = snapshot
            .nodes
            .iter()
            .map(|node| NodePower {
                node: node.name.clone(),
                watts: self.estimate_node(node, snapshot.workloads_on(&node.name)),
            })
            .collect();

        let total_watts = nodes.iter().map(|entry| entry.watts).sum();

        PowerReport { nodes, total_watts }
    }

    /// Rounded draw of one node given the workloads placed on it
    pub fn estimate_node<'a, I>(&self, node: &Node, workloads: I) -> f64
    where
        I: IntoIterator<Item = &'a Workload>,
    {
        let profile = &node.power_profile;
        let (cpu_dynamic, ram_dynamic) = workloads.into_iter().fold((0.0, 0.0), |(cpu, ram), w| {
            let utilization = w.utilization.max(0.0);
            (cpu + w.cpu_cores * utilization, ram + w.memory_gb * utilization)
        });

        let watts = profile.base_idle_watts
            + cpu_dynamic * profile.watts_per_cpu_core
            + ram_dynamic * profile.watts_per_gb_ram;

        debug!(
            node = %node.name,
            cpu_dynamic = cpu_dynamic,
            ram_dynamic = ram_dynamic,
            watts = watts,
            "Estimated node power"
        );

        round2(watts)
    }
}
