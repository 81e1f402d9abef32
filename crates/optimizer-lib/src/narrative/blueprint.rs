//! Blueprint suggestions for planned hardware

use super::{NarrativeError, NarrativeGenerator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Hardware available to a planned deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareNode {
    pub name: String,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub storage_tb: f64,
}

/// Baseline summary plus the generator's notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintSuggestion {
    pub topology: String,
    pub summary: String,
    pub ai_notes: Option<String>,
}

/// Describe the hardware baseline and ask the generator for hints
pub fn suggest_blueprint(
    topology: &str,
    nodes: &[HardwareNode],
    constraints: &Map<String, Value>,
    generator: &dyn NarrativeGenerator,
) -> Result<BlueprintSuggestion, NarrativeError> {
    let payload = json!({
        "topology": topology,
        "nodes": nodes,
        "constraints": constraints,
    });
    let ai_notes = generator.generate_blueprint_suggestions(&payload)?;

    Ok(BlueprintSuggestion {
        topology: topology.to_string(),
        summary: describe_baseline(topology, nodes, constraints),
        ai_notes: Some(ai_notes),
    })
}

fn describe_baseline(topology: &str, nodes: &[HardwareNode], constraints: &Map<String, Value>) -> String {
    let cpu_total: u64 = nodes.iter().map(|n| u64::from(n.cpu_cores)).sum();
    let ram_total: u64 = nodes.iter().map(|n| u64::from(n.memory_gb)).sum();
    let storage_total: f64 = nodes.iter().map(|n| n.storage_tb).sum();

    let constraint_summary = if constraints.is_empty() {
        "no additional constraints".to_string()
    } else {
        constraints
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}={s}"),
                other => format!("{key}={other}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Baseline for {topology}: {} nodes, {cpu_total} cores, {ram_total} GB RAM, \
         {storage_total:.1} TB storage; {constraint_summary}.",
        nodes.len()
    )
}
