//! Power and cost estimation
//!
//! Both estimators are pure functions of their input: the power estimator
//! reads an [`InventorySnapshot`](crate::models::InventorySnapshot) and the
//! cost estimator reads the resulting per-node power map.

mod cost;
mod power;

pub use cost::{
    CostEstimator, CostReport, CostTotal, NodeCost, DEFAULT_CURRENCY, DEFAULT_HOURS_PER_MONTH,
    TOTAL_COST_KEY,
};
pub use power::{NodePower, PowerEntries, PowerEstimator, PowerReport, TOTAL_WATTS_KEY};
