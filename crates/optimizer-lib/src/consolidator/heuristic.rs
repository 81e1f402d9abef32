//! Greedy first-fit consolidation
//!
//! Nodes are filled largest first and workloads are taken lightest first.
//! Each workload lands on the first node whose remaining headroom fits both
//! its cores and its memory. There is no backtracking, so the result is a
//! best-effort plan rather than an optimum.

use crate::models::{round2, ConsolidationPlan, InventorySnapshot, Node, Workload};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Default usable fraction of a node's declared capacity
pub const DEFAULT_HEADROOM: f64 = 0.8;

/// Running placement totals for one node
#[derive(Debug, Clone, Copy, Default)]
struct NodeUsage {
    cpu: f64,
    ram: f64,
    workloads: usize,
}

/// Bin-packs workloads onto as few nodes as headroom allows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicConsolidator {
    pub headroom: f64,
}

impl Default for HeuristicConsolidator {
    fn default() -> Self {
        Self {
            headroom: DEFAULT_HEADROOM,
        }
    }
}

impl HeuristicConsolidator {
    pub fn new(headroom: f64) -> Self {
        Self { headroom }
    }

    /// Produce a placement plan for the snapshot
    ///
    /// Workloads that fit nowhere are left out of `assignments`.
    pub fn consolidate(&self, snapshot: &InventorySnapshot) -> ConsolidationPlan {
        // Both sorts are stable so equal keys keep snapshot order
        let mut nodes: Vec<&Node> = snapshot.nodes.iter().collect();
        nodes.sort_by(|a, b| b.cpu_cores.cmp(&a.cpu_cores));

        let mut workloads: Vec<&Workload> = snapshot.workloads.iter().collect();
        workloads.sort_by(|a, b| a.utilization.total_cmp(&b.utilization));

        let mut usage = vec![NodeUsage::default(); nodes.len()];
        let mut assignments = BTreeMap::new();
        let mut unplaced = 0usize;

        for workload in workloads {
            match self.find_target(workload, &nodes, &usage) {
                Some(slot) => {
                    let target = nodes[slot];
                    let node_usage = &mut usage[slot];
                    node_usage.cpu += workload.cpu_cores;
                    node_usage.ram += workload.memory_gb;
                    node_usage.workloads += 1;

                    debug!(
                        workload = %workload.name,
                        node = %target.name,
                        cpu_used = node_usage.cpu,
                        ram_used = node_usage.ram,
                        "Placed workload"
                    );
                    assignments.insert(workload.name.clone(), target.name.clone());
                }
                None => {
                    unplaced += 1;
                    debug!(workload = %workload.name, "No node has headroom for workload");
                }
            }
        }

        let idle: Vec<&Node> = nodes
            .iter()
            .zip(&usage)
            .filter(|(_, node_usage)| node_usage.workloads == 0)
            .map(|(node, _)| *node)
            .collect();

        let reduction: f64 = idle.iter().map(|node| node.power_profile.base_idle_watts).sum();
        let nodes_to_power_down: Vec<String> = idle.iter().map(|node| node.name.clone()).collect();

        info!(
            placed = assignments.len(),
            unplaced = unplaced,
            power_down = nodes_to_power_down.len(),
            headroom = self.headroom,
            "Consolidation plan computed"
        );

        ConsolidationPlan {
            assignments,
            nodes_to_power_down,
            estimated_idle_watt_reduction: round2(reduction),
        }
    }

    fn find_target(&self, workload: &Workload, nodes: &[&Node], usage: &[NodeUsage]) -> Option<usize> {
        nodes
            .iter()
            .zip(usage)
            .position(|(node, node_usage)| self.fits(workload, node, node_usage))
    }

    fn fits(&self, workload: &Workload, node: &Node, usage: &NodeUsage) -> bool {
        let max_cpu = f64::from(node.cpu_cores) * self.headroom;
        let max_ram = f64::from(node.memory_gb) * self.headroom;
        usage.cpu + workload.cpu_cores <= max_cpu && usage.ram + workload.memory_gb <= max_ram
    }
}
