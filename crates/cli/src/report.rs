//! Markdown and plain-text report rendering

use optimizer_lib::estimator::{CostReport, PowerReport, TOTAL_COST_KEY};
use optimizer_lib::ConsolidationPlan;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

const TITLE: &str = "Homelab cost optimizer report";

/// Row for the power table
#[derive(Tabled)]
struct PowerRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Watts")]
    watts: String,
}

/// Row for the monthly cost table
#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Currency")]
    currency: String,
}

/// Row for the consolidation table
#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Target node")]
    target: String,
}

/// Report layout, chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Markdown,
    Text,
}

impl ReportKind {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") => ReportKind::Text,
            _ => ReportKind::Markdown,
        }
    }

    pub fn render(self, power: &PowerReport, cost: &CostReport, plan: Option<&ConsolidationPlan>) -> String {
        match self {
            ReportKind::Markdown => render_markdown(power, cost, plan),
            ReportKind::Text => render_text(power, cost, plan),
        }
    }
}

fn power_rows(power: &PowerReport) -> Vec<PowerRow> {
    power
        .iter()
        .map(|(node, watts)| PowerRow {
            node: node.to_string(),
            watts: format!("{:.2}", watts),
        })
        .collect()
}

fn cost_rows(cost: &CostReport) -> Vec<CostRow> {
    let mut rows: Vec<CostRow> = cost
        .nodes
        .iter()
        .map(|entry| CostRow {
            node: entry.node.clone(),
            cost: format!("{:.2}", entry.monthly_cost),
            currency: entry.currency.clone(),
        })
        .collect();
    rows.push(CostRow {
        node: TOTAL_COST_KEY.to_string(),
        cost: format!("{:.2}", cost.total.monthly_cost),
        currency: cost.total.currency.clone(),
    });
    rows
}

fn markdown_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::markdown()).to_string()
}

/// Markdown report with power, cost and (optionally) consolidation tables
pub fn render_markdown(power: &PowerReport, cost: &CostReport, plan: Option<&ConsolidationPlan>) -> String {
    let mut md = vec![
        format!("# {TITLE}"),
        String::new(),
        "## Power consumption".to_string(),
        String::new(),
        markdown_table(power_rows(power)),
        String::new(),
        "## Monthly cost".to_string(),
        String::new(),
        markdown_table(cost_rows(cost)),
    ];

    if let Some(plan) = plan.filter(|plan| !plan.assignments.is_empty()) {
        let rows: Vec<AssignmentRow> = plan
            .assignments
            .iter()
            .map(|(workload, target)| AssignmentRow {
                workload: workload.clone(),
                target: target.clone(),
            })
            .collect();

        md.extend([
            String::new(),
            "## Consolidation plan".to_string(),
            String::new(),
            markdown_table(rows),
        ]);

        if !plan.nodes_to_power_down.is_empty() {
            md.extend([
                String::new(),
                format!(
                    "Nodes to power down: {} (idle reduction {:.2} W)",
                    plan.nodes_to_power_down.join(", "),
                    plan.estimated_idle_watt_reduction
                ),
            ]);
        }
    }

    md.join("\n")
}

/// Plain-text report listing power and cost per node
pub fn render_text(power: &PowerReport, cost: &CostReport, plan: Option<&ConsolidationPlan>) -> String {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len()), String::new()];

    lines.push("Power consumption (watts):".to_string());
    lines.extend(power.iter().map(|(node, watts)| format!("- {node}: {watts:.2}W")));

    lines.push(String::new());
    lines.push("Monthly cost estimates:".to_string());
    lines.extend(
        cost_rows(cost)
            .into_iter()
            .map(|row| format!("- {}: {} {}", row.node, row.cost, row.currency)),
    );

    if let Some(plan) = plan.filter(|plan| !plan.assignments.is_empty()) {
        lines.push(String::new());
        lines.push("Consolidation plan:".to_string());
        lines.extend(
            plan.assignments
                .iter()
                .map(|(workload, target)| format!("- {workload} -> {target}")),
        );
    }

    lines.join("\n")
}

/// Append the narrative section to a rendered report
pub fn append_ai_summary(report: &str, summary: &str) -> String {
    format!("{report}\n\n---\n\n### AI summary\n\n{summary}\n")
}
