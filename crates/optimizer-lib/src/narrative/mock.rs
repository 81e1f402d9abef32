//! Deterministic narrative provider for tests and offline use

use super::{NarrativeError, NarrativeGenerator};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockNarrator;

impl NarrativeGenerator for MockNarrator {
    fn generate_blueprint_suggestions(&self, payload: &Value) -> Result<String, NarrativeError> {
        let topology = payload.get("topology").and_then(Value::as_str).unwrap_or("unknown");
        let node_count = payload.get("nodes").and_then(Value::as_array).map_or(0, Vec::len);

        Ok(format!(
            "Mock suggestion for {topology}: plan around {node_count} nodes, \
             allocate storage tiers explicitly, and prefer VLAN-tagged networks."
        ))
    }

    fn generate_cost_optimization_report(&self, payload: &Value) -> Result<String, NarrativeError> {
        let savings = payload.get("savings").and_then(Value::as_f64).unwrap_or(0.0);
        let scenario = payload.get("scenario").and_then(Value::as_str).unwrap_or("baseline");

        Ok(format!(
            "Scenario '{scenario}' could save approximately {savings:.2} currency units per month. \
             Review workload affinity before executing the plan."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blueprint_suggestion_counts_nodes() {
        let text = MockNarrator
            .generate_blueprint_suggestions(&json!({"topology": "k3s", "nodes": [{}, {}, {}]}))
            .unwrap();
        assert!(text.starts_with("Mock suggestion for k3s: plan around 3 nodes"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let blueprint = MockNarrator.generate_blueprint_suggestions(&json!({})).unwrap();
        assert!(blueprint.contains("for unknown: plan around 0 nodes"));

        let report = MockNarrator.generate_cost_optimization_report(&json!({})).unwrap();
        assert!(report.starts_with("Scenario 'baseline' could save approximately 0.00"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let payload = json!({"scenario": "weekend", "savings": 3.14159});
        let first = MockNarrator.generate_cost_optimization_report(&payload).unwrap();
        let second = MockNarrator.generate_cost_optimization_report(&payload).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("3.14 currency units"));
    }
}
