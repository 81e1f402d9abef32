//! Normalization of loosely-typed inventory records
//!
//! Collectors hand over JSON-like records (`{"nodes": [...], "workloads":
//! [...], "metadata": {...}}`). This module turns them into an
//! [`InventorySnapshot`], filling defaults for optional fields. Only a
//! missing `name` or an unusable value is treated as an error; references
//! between workloads and nodes are not checked.

use crate::models::{InventorySnapshot, Node, PowerProfile, Workload};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Node name used for workloads that do not say where they run
pub const UNKNOWN_NODE: &str = "unknown";

/// Errors raised while normalizing raw inventory records
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{record} record #{index} is missing required field `{field}`")]
    MissingField {
        record: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{record} record #{index} has invalid `{field}`: {reason}")]
    InvalidField {
        record: &'static str,
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("`{section}` must be {expected}")]
    InvalidSection {
        section: &'static str,
        expected: &'static str,
    },

    #[error("inventory is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InventoryError>;

/// Build a snapshot from a raw record
pub fn build_snapshot(dataset: &Value) -> Result<InventorySnapshot> {
    let root = dataset.as_object().ok_or(InventoryError::InvalidSection {
        section: "inventory",
        expected: "an object",
    })?;

    let nodes = records(root, "nodes")?
        .iter()
        .enumerate()
        .map(|(index, raw)| node_from_record(index, raw))
        .collect::<Result<Vec<_>>>()?;

    let workloads = records(root, "workloads")?
        .iter()
        .enumerate()
        .map(|(index, raw)| workload_from_record(index, raw))
        .collect::<Result<Vec<_>>>()?;

    let metadata = match root.get("metadata") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(map)) => string_map(map),
        Some(_) => {
            return Err(InventoryError::InvalidSection {
                section: "metadata",
                expected: "an object",
            })
        }
    };

    tracing::debug!(
        nodes = nodes.len(),
        workloads = workloads.len(),
        "Normalized inventory records"
    );

    Ok(InventorySnapshot {
        nodes,
        workloads,
        metadata,
    })
}

/// Parse JSON text and normalize it
pub fn snapshot_from_str(text: &str) -> Result<InventorySnapshot> {
    let value: Value = serde_json::from_str(text)?;
    build_snapshot(&value)
}

fn records<'a>(root: &'a Map<String, Value>, section: &'static str) -> Result<&'a [Value]> {
    match root.get(section) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(InventoryError::InvalidSection {
            section,
            expected: "an array",
        }),
    }
}

fn node_from_record(index: usize, raw: &Value) -> Result<Node> {
    const RECORD: &str = "node";
    let fields = as_record(RECORD, index, raw)?;
    let field = Fields {
        record: RECORD,
        index,
        map: fields,
    };

    let power_profile = match fields.get("power_profile") {
        None | Some(Value::Null) => PowerProfile::default(),
        Some(Value::Object(map)) if map.is_empty() => PowerProfile::default(),
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value.clone()).map_err(|err| InventoryError::InvalidField {
                record: RECORD,
                index,
                field: "power_profile",
                reason: err.to_string(),
            })?
        }
        Some(_) => return Err(field.invalid("power_profile", "expected an object")),
    };

    Ok(Node {
        name: field.required_string("name")?,
        kind: field.string_or("kind", "unknown")?,
        cpu_cores: field.whole_number("cpu_cores")?,
        memory_gb: field.whole_number("memory_gb")?,
        power_profile,
        metadata: field.string_map("metadata")?,
    })
}

fn workload_from_record(index: usize, raw: &Value) -> Result<Workload> {
    const RECORD: &str = "workload";
    let field = Fields {
        record: RECORD,
        index,
        map: as_record(RECORD, index, raw)?,
    };

    Ok(Workload {
        name: field.required_string("name")?,
        workload_type: field.string_or("workload_type", "vm")?,
        cpu_cores: field.number("cpu_cores")?,
        memory_gb: field.number("memory_gb")?,
        utilization: field.number("utilization")?,
        node_name: field.string_or("node_name", UNKNOWN_NODE)?,
        labels: field.string_map("labels")?,
    })
}

fn as_record<'a>(record: &'static str, index: usize, raw: &'a Value) -> Result<&'a Map<String, Value>> {
    raw.as_object().ok_or_else(|| InventoryError::InvalidField {
        record,
        index,
        field: "record",
        reason: "expected an object".to_string(),
    })
}

/// Field accessors for a single record, carrying its position for errors
struct Fields<'a> {
    record: &'static str,
    index: usize,
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> InventoryError {
        InventoryError::InvalidField {
            record: self.record,
            index: self.index,
            field,
            reason: reason.into(),
        }
    }

    fn present(&self, field: &str) -> Option<&Value> {
        self.map.get(field).filter(|value| !value.is_null())
    }

    fn required_string(&self, field: &'static str) -> Result<String> {
        match self.present(field) {
            None => Err(InventoryError::MissingField {
                record: self.record,
                index: self.index,
                field,
            }),
            Some(value) => scalar_string(value).ok_or_else(|| self.invalid(field, "expected a string")),
        }
    }

    fn string_or(&self, field: &'static str, default: &str) -> Result<String> {
        match self.present(field) {
            None => Ok(default.to_string()),
            Some(value) => scalar_string(value).ok_or_else(|| self.invalid(field, "expected a string")),
        }
    }

    fn number(&self, field: &'static str) -> Result<f64> {
        match self.present(field) {
            None => Ok(0.0),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| self.invalid(field, "number out of range")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(field, format!("`{s}` is not a number"))),
            Some(_) => Err(self.invalid(field, "expected a number")),
        }
    }

    /// Capacities are whole units; fractional input is truncated toward zero
    fn whole_number(&self, field: &'static str) -> Result<u32> {
        let value = self.number(field)?;
        if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
            return Err(self.invalid(field, format!("{value} is not a valid capacity")));
        }
        Ok(value.trunc() as u32)
    }

    fn string_map(&self, field: &'static str) -> Result<BTreeMap<String, String>> {
        match self.present(field) {
            None => Ok(BTreeMap::new()),
            Some(Value::Object(map)) => Ok(string_map(map)),
            Some(_) => Err(self.invalid(field, "expected an object")),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_map(map: &Map<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => scalar_string(other).unwrap_or_else(|| other.to_string()),
            };
            Some((key.clone(), text))
        })
        .collect()
}
