//! Narrative text generation
//!
//! Free-form summaries are produced by an injected [`NarrativeGenerator`].
//! The estimators never depend on it; callers pass a generator in when they
//! want prose next to the numbers. [`MockNarrator`] is deterministic and
//! needs no network access.

mod blueprint;
mod mock;

pub use blueprint::{suggest_blueprint, BlueprintSuggestion, HardwareNode};
pub use mock::MockNarrator;

use crate::estimator::{CostReport, PowerReport};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors raised by narrative generators
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative provider returned no text")]
    Empty,
}

/// Capability interface for narrative providers
pub trait NarrativeGenerator: Send + Sync {
    /// Human-readable hints for an infrastructure blueprint
    fn generate_blueprint_suggestions(&self, payload: &Value) -> Result<String, NarrativeError>;

    /// Narrative summary of a cost optimization scenario
    fn generate_cost_optimization_report(&self, payload: &Value) -> Result<String, NarrativeError>;
}

/// Payload handed to [`NarrativeGenerator::generate_cost_optimization_report`]
pub fn cost_optimization_payload(
    scenario: &str,
    power: &PowerReport,
    cost: &CostReport,
    savings: f64,
) -> Value {
    json!({
        "scenario": scenario,
        "power": power,
        "cost": cost,
        "savings": savings,
    })
}

/// Ask the generator for a cost narrative of the given scenario
pub fn render_ai_report(
    power: &PowerReport,
    cost: &CostReport,
    scenario: &str,
    savings: f64,
    generator: &dyn NarrativeGenerator,
) -> Result<String, NarrativeError> {
    let payload = cost_optimization_payload(scenario, power, cost, savings);
    let text = generator.generate_cost_optimization_report(&payload)?;
    if text.trim().is_empty() {
        return Err(NarrativeError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{CostEstimator, PowerEstimator};
    use crate::models::{InventorySnapshot, Node};

    struct SilentNarrator;

    impl NarrativeGenerator for SilentNarrator {
        fn generate_blueprint_suggestions(&self, _payload: &Value) -> Result<String, NarrativeError> {
            Ok(String::new())
        }

        fn generate_cost_optimization_report(&self, _payload: &Value) -> Result<String, NarrativeError> {
            Ok("   ".to_string())
        }
    }

    fn reports() -> (PowerReport, CostReport) {
        let snapshot = InventorySnapshot::new(vec![Node::new("n1", "proxmox", 8, 32)], Vec::new());
        let power = PowerEstimator::new().estimate(&snapshot);
        let cost = CostEstimator::new(0.2).estimate(&power);
        (power, cost)
    }

    #[test]
    fn test_payload_shape() {
        let (power, cost) = reports();
        let payload = cost_optimization_payload("consolidate-low-util", &power, &cost, 12.5);

        assert_eq!(payload["scenario"], "consolidate-low-util");
        assert_eq!(payload["power"]["n1"], 60.0);
        assert_eq!(payload["cost"]["total"]["currency"], "USD");
        assert_eq!(payload["savings"], 12.5);
    }

    #[test]
    fn test_render_ai_report_with_mock() {
        let (power, cost) = reports();
        let text = render_ai_report(&power, &cost, "baseline", 60.0, &MockNarrator).unwrap();
        assert!(text.contains("Scenario 'baseline'"));
        assert!(text.contains("60.00"));
    }

    #[test]
    fn test_blank_narrative_is_an_error() {
        let (power, cost) = reports();
        let err = render_ai_report(&power, &cost, "baseline", 0.0, &SilentNarrator).unwrap_err();
        assert!(matches!(err, NarrativeError::Empty));
    }
}
