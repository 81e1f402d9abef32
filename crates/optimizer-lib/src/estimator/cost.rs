//! Monthly electricity cost from power estimates

use super::power::TOTAL_WATTS_KEY;
use crate::models::round2;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

/// Reserved key of the summed cost entry
pub const TOTAL_COST_KEY: &str = "total";

/// Default currency label
pub const DEFAULT_CURRENCY: &str = "USD";

/// Average hours in a month (8760 / 12)
pub const DEFAULT_HOURS_PER_MONTH: u32 = 730;

/// Monthly energy and cost of one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeCost {
    #[serde(skip)]
    pub node: String,
    pub kwh: f64,
    pub monthly_cost: f64,
    pub currency: String,
}

/// Summed cost across nodes; carries no energy figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTotal {
    pub monthly_cost: f64,
    pub currency: String,
}

/// Per-node cost breakdown plus total
///
/// Serializes as `{"<node>": {"kwh", "monthly_cost", "currency"}, ...,
/// "total": {"monthly_cost", "currency"}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub nodes: Vec<NodeCost>,
    pub total: CostTotal,
}

impl CostReport {
    pub fn node(&self, name: &str) -> Option<&NodeCost> {
        self.nodes.iter().find(|entry| entry.node == name)
    }

    pub fn currency(&self) -> &str {
        &self.total.currency
    }
}

impl Serialize for CostReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len() + 1))?;
        for entry in &self.nodes {
            map.serialize_entry(&entry.node, entry)?;
        }
        map.serialize_entry(TOTAL_COST_KEY, &self.total)?;
        map.end()
    }
}

/// Converts watts into monthly kWh and cost at a flat tariff
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimator {
    pub price_per_kwh: f64,
    pub currency: String,
    pub hours_per_month: u32,
}

impl CostEstimator {
    /// Estimator in the default currency over an average month
    pub fn new(price_per_kwh: f64) -> Self {
        Self {
            price_per_kwh,
            currency: DEFAULT_CURRENCY.to_string(),
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_hours_per_month(mut self, hours: u32) -> Self {
        self.hours_per_month = hours;
        self
    }

    /// Cost every `(node, watts)` entry; the `total_watts` entry is skipped
    pub fn estimate<'a, I>(&self, power_by_node: I) -> CostReport
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let nodes: Vec<NodeCost> = power_by_node
            .into_iter()
            .filter(|(node, _)| *node != TOTAL_WATTS_KEY)
            .map(|(node, watts)| self.node_cost(node, watts))
            .collect();

        let total_cost: f64 = nodes.iter().map(|entry| entry.monthly_cost).sum();

        debug!(
            nodes = nodes.len(),
            total_cost = total_cost,
            currency = %self.currency,
            "Estimated monthly cost"
        );

        CostReport {
            nodes,
            total: CostTotal {
                monthly_cost: round2(total_cost),
                currency: self.currency.clone(),
            },
        }
    }

    fn node_cost(&self, node: &str, watts: f64) -> NodeCost {
        let kwh = watts * f64::from(self.hours_per_month) / 1000.0;
        let cost = kwh * self.price_per_kwh;
        NodeCost {
            node: node.to_string(),
            kwh: round2(kwh),
            monthly_cost: round2(cost),
            currency: self.currency.clone(),
        }
    }
}
