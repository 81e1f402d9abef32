//! Workload consolidation planning
//!
//! Suggests moving workloads onto fewer nodes so that idle hosts can be
//! powered down. The plan is a new value; the snapshot is never modified.

mod heuristic;

pub use heuristic::{HeuristicConsolidator, DEFAULT_HEADROOM};
