//! Spendwise CLI - Budget analytics from the command line
//!
//! Usage:
//!   spendwise budgets                 Analyze budgets for the current period
//!   spendwise patterns                Analyze spending habits over recent months
//!   spendwise check -c 7 -a 25000     Would this expense exceed a budget?
//!   spendwise alerts                  Show alerts not yet delivered
//!   spendwise config show             Print the effective thresholds

mod cli;
mod commands;
mod render;
mod store;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let ctx = commands::Context {
        snapshot: cli.snapshot,
        transactions: cli.transactions,
        config: cli.config,
        now: cli.now,
        json: cli.json,
    };

    match cli.command {
        Commands::Budgets { wallet, quick } => commands::cmd_budgets(&ctx, wallet, quick),
        Commands::Patterns { wallet } => commands::cmd_patterns(&ctx, wallet),
        Commands::Check { category, amount } => commands::cmd_check(&ctx, category, amount),
        Commands::Alerts {
            ledger,
            dry_run,
            reset,
        } => commands::cmd_alerts(&ctx, &ledger, dry_run, reset),
        Commands::Config { action } => match action {
            None | Some(ConfigAction::Show) => commands::cmd_config_show(&ctx),
            Some(ConfigAction::Path) => commands::cmd_config_path(),
            Some(ConfigAction::Init { force }) => commands::cmd_config_init(force),
        },
    }
}
