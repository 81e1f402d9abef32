//! Power and cost analysis command

use anyhow::Result;
use colored::Colorize;
use optimizer_lib::{CostReport, PowerEstimator, PowerReport, StructuredLogger};
use serde_json::json;
use std::path::Path;
use tabled::Tabled;

use super::{load_snapshot, write_output};
use crate::config::Settings;
use crate::output::{format_currency, format_watts, print_heading, print_json, print_success, print_table, OutputFormat};
use crate::report::ReportKind;

/// Row for the per-node summary table
#[derive(Tabled)]
pub(crate) struct NodeSummaryRow {
    #[tabled(rename = "Node")]
    pub node: String,
    #[tabled(rename = "Power")]
    pub power: String,
    #[tabled(rename = "kWh / month")]
    pub kwh: String,
    #[tabled(rename = "Monthly cost")]
    pub monthly_cost: String,
}

pub(crate) fn summary_rows(power: &PowerReport, cost: &CostReport) -> Vec<NodeSummaryRow> {
    power
        .nodes
        .iter()
        .map(|watts| {
            let entry = cost.node(&watts.node);
            NodeSummaryRow {
                node: watts.node.clone(),
                power: format_watts(watts.watts),
                kwh: entry.map_or_else(|| "-".to_string(), |entry| format!("{:.2}", entry.kwh)),
                monthly_cost: entry.map_or_else(
                    || "-".to_string(),
                    |entry| format_currency(entry.monthly_cost, &entry.currency),
                ),
            }
        })
        .collect()
}

/// Print the per-node table followed by the totals
pub(crate) fn print_summary(power: &PowerReport, cost: &CostReport) {
    print_table(&summary_rows(power, cost));
    println!(
        "{} {}  {} {}",
        "Total power:".bold(),
        format_watts(power.total_watts),
        "Total monthly cost:".bold(),
        format_currency(cost.total.monthly_cost, &cost.total.currency).green()
    );
}

/// Estimate power and cost for an inventory snapshot
pub fn analyze(inventory: &Path, electricity: Option<&Path>, out: Option<&Path>, format: OutputFormat) -> Result<()> {
    let snapshot = load_snapshot(inventory)?;
    let settings = Settings::load(electricity)?;
    let logger = StructuredLogger::new("analyze");
    logger.log_snapshot(&snapshot);

    let power = PowerEstimator::new().estimate(&snapshot);
    logger.log_power(&power);
    let cost = settings.electricity.cost_estimator().estimate(&power);
    logger.log_cost(&cost);

    if let Some(out) = out {
        let report = ReportKind::for_path(out).render(&power, &cost, None);
        write_output(out, &report)?;
        logger.log_report_written(&out.display().to_string(), report.len());
    }

    match format {
        OutputFormat::Json => print_json(&json!({ "power": power, "cost": cost }))?,
        OutputFormat::Table => match out {
            Some(out) => {
                print_heading("Power & Cost Analysis");
                print_summary(&power, &cost);
                println!();
                print_success(&format!("Report written to {}", out.display()));
            }
            None => println!("{}", ReportKind::Markdown.render(&power, &cost, None)),
        },
    }

    Ok(())
}
