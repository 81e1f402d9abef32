//! Consolidation suggestion command

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use optimizer_lib::narrative::{render_ai_report, MockNarrator};
use optimizer_lib::{HeuristicConsolidator, PowerEstimator, StructuredLogger};
use serde_json::json;
use std::fmt;
use std::path::Path;
use tabled::Tabled;

use super::analyze::print_summary;
use super::{load_snapshot, write_output};
use crate::config::Settings;
use crate::output::{
    format_currency, format_watts, print_heading, print_info, print_json, print_success, print_table, OutputFormat,
};
use crate::report::{append_ai_summary, ReportKind};

/// Optimization scenario to plan for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Pack low-utilization workloads onto fewer nodes
    #[default]
    ConsolidateLowUtil,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::ConsolidateLowUtil => write!(f, "consolidate-low-util"),
        }
    }
}

/// Row for the assignment table
#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
}

/// Options for [`suggest`]
pub struct SuggestOptions<'a> {
    pub inventory: &'a Path,
    pub electricity: Option<&'a Path>,
    pub scenario: Scenario,
    pub headroom: Option<f64>,
    pub out: Option<&'a Path>,
    pub ai_report: bool,
}

/// Plan a consolidation and report the power and cost picture
pub fn suggest(options: SuggestOptions<'_>, format: OutputFormat) -> Result<()> {
    let snapshot = load_snapshot(options.inventory)?;
    let settings = Settings::load(options.electricity)?;
    let headroom = options.headroom.unwrap_or(settings.consolidation.headroom);
    let logger = StructuredLogger::new(options.scenario.to_string());
    logger.log_snapshot(&snapshot);

    let power = PowerEstimator::new().estimate(&snapshot);
    logger.log_power(&power);
    let estimator = settings.electricity.cost_estimator();
    let cost = estimator.estimate(&power);
    logger.log_cost(&cost);

    let plan = HeuristicConsolidator::new(headroom).consolidate(&snapshot);
    logger.log_plan(&plan, snapshot.workloads.len());

    let savings = estimator
        .estimate([("idle_reduction", plan.estimated_idle_watt_reduction)])
        .total
        .monthly_cost;

    let ai_summary = if options.ai_report {
        let scenario = options.scenario.to_string();
        let text = render_ai_report(&power, &cost, &scenario, plan.estimated_idle_watt_reduction, &MockNarrator)
            .context("Failed to generate the AI summary")?;
        Some(text)
    } else {
        None
    };

    if let Some(out) = options.out {
        let mut report = ReportKind::for_path(out).render(&power, &cost, Some(&plan));
        if let Some(text) = &ai_summary {
            report = append_ai_summary(&report, text);
        }
        write_output(out, &report)?;
        logger.log_report_written(&out.display().to_string(), report.len());
    }

    match format {
        OutputFormat::Json => print_json(&json!({
            "scenario": options.scenario.to_string(),
            "headroom": headroom,
            "plan": plan,
            "power": power,
            "cost": cost,
            "monthly_savings": savings,
            "ai_summary": ai_summary,
        }))?,
        OutputFormat::Table => {
            print_heading(&format!("Scenario: {}", options.scenario));
            print_summary(&power, &cost);
            println!();

            println!("{}", "Workload moves".bold());
            let rows: Vec<AssignmentRow> = snapshot
                .workloads
                .iter()
                .filter_map(|workload| {
                    plan.assignments.get(&workload.name).map(|target| AssignmentRow {
                        workload: workload.name.clone(),
                        from: workload.node_name.clone(),
                        to: target.clone(),
                    })
                })
                .collect();
            print_table(&rows);
            println!();

            if plan.nodes_to_power_down.is_empty() {
                print_info("No node can be powered down at this headroom");
            } else {
                println!(
                    "{} {}",
                    "Power down:".bold(),
                    plan.nodes_to_power_down.join(", ").cyan()
                );
                println!(
                    "{} {} ({} / month)",
                    "Idle reduction:".bold(),
                    format_watts(plan.estimated_idle_watt_reduction),
                    format_currency(savings, &cost.total.currency).green()
                );
            }

            if let Some(text) = &ai_summary {
                println!();
                println!("{}", "AI summary".bold());
                println!("{}", text);
            }

            if let Some(out) = options.out {
                println!();
                print_success(&format!("Report written to {}", out.display()));
            }
        }
    }

    Ok(())
}
