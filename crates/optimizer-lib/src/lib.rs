//! Homelab power and cost optimizer library
//!
//! This crate provides the core functionality for:
//! - Normalizing collected inventory into snapshots
//! - Estimating per-node power draw and monthly electricity cost
//! - Planning workload consolidation so idle nodes can be powered down
//! - Narrative summaries through a pluggable generator

pub mod collector;
pub mod consolidator;
pub mod estimator;
pub mod inventory;
pub mod models;
pub mod narrative;
pub mod observability;


pub use collector::{Collector, CollectorError, CollectorRegistry};
pub use consolidator::HeuristicConsolidator;
pub use estimator::{CostEstimator, CostReport, PowerEstimator, PowerReport};
pub use inventory::{build_snapshot, InventoryError};
pub use models::*;
pub use observability::StructuredLogger;
