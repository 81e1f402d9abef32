//! Inventory collection command

use anyhow::{Context, Result};
use optimizer_lib::{CollectorRegistry, StructuredLogger};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::write_output;
use crate::output::{format_timestamp, print_info, print_json, print_success, print_warning, OutputFormat};

/// Run a collector and write the snapshot as pretty JSON
pub fn collect(source: &str, out: &Path, mock_data: Option<&Path>, format: OutputFormat) -> Result<()> {
    let dataset = match mock_data {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("Failed to read mock data {}", path.display()))?;
            let value: Value =
                serde_json::from_str(&text).with_context(|| format!("Mock data {} is not JSON", path.display()))?;
            Some(value)
        }
        None => None,
    };

    let registry = CollectorRegistry::with_builtin();
    let collector = registry.create(source, dataset)?;
    let snapshot = collector
        .collect()
        .with_context(|| format!("Collector `{}` failed", collector.source()))?;

    let logger = StructuredLogger::new(collector.source());
    logger.log_snapshot(&snapshot);

    let body = serde_json::to_string_pretty(&snapshot)?;
    write_output(out, &body)?;
    logger.log_report_written(&out.display().to_string(), body.len());

    match format {
        OutputFormat::Json => print_json(&json!({
            "source": collector.source(),
            "out": out.display().to_string(),
            "nodes": snapshot.nodes.len(),
            "workloads": snapshot.workloads.len(),
        }))?,
        OutputFormat::Table => {
            if mock_data.is_none() {
                print_warning("No mock data given, using the simulated inventory");
            }
            print_success(&format!(
                "Collected {} nodes and {} workloads from {} into {}",
                snapshot.nodes.len(),
                snapshot.workloads.len(),
                collector.source(),
                out.display()
            ));
            if let Some(collected_at) = snapshot.metadata.get("collected_at") {
                print_info(&format!("Collected at {}", format_timestamp(collected_at)));
            }
        }
    }

    Ok(())
}
