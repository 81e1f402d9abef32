//! Structured logging for pipeline milestones
//!
//! Every event carries an `event` field and the inventory `source`, so the
//! JSON formatter of `tracing-subscriber` yields one machine-readable line
//! per stage.

use crate::estimator::{CostReport, PowerReport};
use crate::models::{ConsolidationPlan, InventorySnapshot};
use tracing::{info, warn};

/// Structured logger for optimizer runs
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Log a loaded snapshot and warn about workloads pointing at unknown nodes
    pub fn log_snapshot(&self, snapshot: &InventorySnapshot) {
        let dangling = dangling_workloads(snapshot);

        info!(
            event = "snapshot_loaded",
            source = %self.source,
            nodes = snapshot.nodes.len(),
            workloads = snapshot.workloads.len(),
            dangling = dangling.len(),
            "Inventory snapshot loaded"
        );

        if !dangling.is_empty() {
            warn!(
                event = "dangling_workloads",
                source = %self.source,
                workloads = ?dangling,
                "Workloads reference nodes missing from the snapshot and are excluded from estimates"
            );
        }
    }

    pub fn log_power(&self, power: &PowerReport) {
        info!(
            event = "power_estimated",
            source = %self.source,
            nodes = power.nodes.len(),
            total_watts = power.total_watts,
            "Power draw estimated"
        );
    }

    pub fn log_cost(&self, cost: &CostReport) {
        info!(
            event = "cost_estimated",
            source = %self.source,
            nodes = cost.nodes.len(),
            monthly_cost = cost.total.monthly_cost,
            currency = %cost.total.currency,
            "Monthly cost estimated"
        );
    }

    pub fn log_plan(&self, plan: &ConsolidationPlan, workloads: usize) {
        let unplaced = workloads.saturating_sub(plan.assignments.len());

        info!(
            event = "consolidation_planned",
            source = %self.source,
            placed = plan.assignments.len(),
            unplaced = unplaced,
            power_down = ?plan.nodes_to_power_down,
            idle_watt_reduction = plan.estimated_idle_watt_reduction,
            "Consolidation plan ready"
        );

        if unplaced > 0 {
            warn!(
                event = "unplaced_workloads",
                source = %self.source,
                unplaced = unplaced,
                "Some workloads fit on no node within headroom"
            );
        }
    }

    pub fn log_report_written(&self, path: &str, bytes: usize) {
        info!(
            event = "report_written",
            source = %self.source,
            path = %path,
            bytes = bytes,
            "Report written"
        );
    }
}

/// Names of workloads whose `node_name` matches no node
pub fn dangling_workloads(snapshot: &InventorySnapshot) -> Vec<&str> {
    snapshot
        .workloads
        .iter()
        .filter(|w| snapshot.node_by_name(&w.node_name).is_none())
        .map(|w| w.name.as_str())
        .collect()
}
