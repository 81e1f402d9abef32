//! Homelab cost optimizer CLI
//!
//! A command-line tool for collecting homelab inventory, estimating power
//! draw and electricity cost, and suggesting workload consolidation.

mod commands;
mod config;
mod output;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::suggest::{Scenario, SuggestOptions};
use commands::{analyze, collect, suggest};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Homelab cost optimizer CLI
#[derive(Parser)]
#[command(name = "hlo")]
#[command(author, version, about = "Homelab cost optimizer: power, cost and consolidation planning", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect inventory from a platform into a snapshot file
    Collect {
        /// Platform to collect from (proxmox, libvirt, docker, k8s)
        #[arg(long, short)]
        source: String,

        /// Snapshot output path
        #[arg(long, short)]
        out: PathBuf,

        /// Fixture dataset used instead of the simulated inventory
        #[arg(long)]
        mock_data: Option<PathBuf>,
    },

    /// Estimate power draw and monthly cost
    Analyze {
        /// Inventory snapshot path
        #[arg(long, short)]
        inventory: PathBuf,

        /// Electricity settings file
        #[arg(long, short, env = "HLO_ELECTRICITY_FILE")]
        electricity: Option<PathBuf>,

        /// Report output path (.md or .txt); printed to stdout if omitted
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Suggest a consolidation plan
    Suggest {
        /// Inventory snapshot path
        #[arg(long, short)]
        inventory: PathBuf,

        /// Electricity settings file
        #[arg(long, short, env = "HLO_ELECTRICITY_FILE")]
        electricity: Option<PathBuf>,

        /// Optimization scenario
        #[arg(long, value_enum, default_value_t = Scenario::ConsolidateLowUtil)]
        scenario: Scenario,

        /// Usable fraction of each node's capacity
        #[arg(long)]
        headroom: Option<f64>,

        /// Report output path (.md or .txt)
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Append a narrative summary to the report
        #[arg(long)]
        ai_report: bool,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = match &cli.command {
        Commands::Collect { source, out, mock_data } => {
            collect::collect(source, out, mock_data.as_deref(), cli.format)
        }
        Commands::Analyze {
            inventory,
            electricity,
            out,
        } => analyze::analyze(inventory, electricity.as_deref(), out.as_deref(), cli.format),
        Commands::Suggest {
            inventory,
            electricity,
            scenario,
            headroom,
            out,
            ai_report,
        } => suggest::suggest(
            SuggestOptions {
                inventory,
                electricity: electricity.as_deref(),
                scenario: *scenario,
                headroom: *headroom,
                out: out.as_deref(),
                ai_report: *ai_report,
            },
            cli.format,
        ),
    };

    if let Err(err) = result {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
    Ok(())
}
