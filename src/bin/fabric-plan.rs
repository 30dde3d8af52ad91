// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fabric Planner CLI
//!
//! Reads a menu, plans the fabric and writes the plan as JSON.
//!
//! Run with: cargo run --bin fabric-plan -- -f demos/menu.toml -o plan.json
//!
//! Checks can also be toggled through `FABRIC_PLAN_CHECK_CAPACITY` and
//! `FABRIC_PLAN_CHECK_COLLISIONS`; flags take precedence.

use anyhow::{Context, Result};
use cim_fabric_topology::{Menu, PlannerConfig, TopologyPlan};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Plan addresses and ASNs for a simulated spine-leaf fabric
#[derive(Debug, Parser)]
#[command(name = "fabric-plan", version, about)]
struct Args {
    /// Menu file (TOML, or JSON with a .json extension)
    #[arg(short = 'f', long = "menu")]
    menu: PathBuf,

    /// Output file; the plan is written to stdout when omitted
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON plan
    #[arg(long)]
    pretty: bool,

    /// Skip node subnet and external pool capacity checks
    #[arg(long)]
    no_capacity_check: bool,

    /// Skip the plan-wide address collision check
    #[arg(long)]
    no_collision_check: bool,
}

impl Args {
    fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = PlannerConfig::from_env().context("Invalid planner environment")?;
        if self.no_capacity_check {
            config = config.with_capacity_check(false);
        }
        if self.no_collision_check {
            config = config.with_collision_check(false);
        }
        Ok(config)
    }
}

fn render(plan: &TopologyPlan, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(plan)
    } else {
        serde_json::to_string(plan)
    };
    json.context("Failed to serialize plan")
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the plan
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = args.planner_config()?;
    if !config.check_capacity {
        warn!("⚠️  Capacity checks disabled: servers may overflow their node subnets");
    }
    if !config.check_collisions {
        warn!("⚠️  Collision check disabled: overlapping pools will not be detected");
    }

    let menu = Menu::load(&args.menu)
        .with_context(|| format!("Failed to load menu {}", args.menu.display()))?;
    let plan = menu.plan(&config).context("Failed to plan fabric")?;
    let public: Vec<String> = plan
        .asns()
        .filter(|asn| !asn.is_private())
        .map(|asn| asn.to_string())
        .collect();
    if !public.is_empty() {
        warn!("⚠️  ASNs outside the private-use ranges: {}", public.join(", "));
    }
    info!(
        "✅ Planned {} racks, {} spines, {} servers",
        plan.racks.len(),
        plan.spines.len(),
        plan.server_count()
    );

    let rendered = render(&plan, args.pretty)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("📝 Wrote plan to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", rendered).context("Failed to write plan to stdout")?;
        }
    }

    Ok(())
}
