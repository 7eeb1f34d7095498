//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendwise - Know where your budget stands
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Budget insights, spending patterns and alerts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot of budgets and categories (JSON)
    #[arg(long, default_value = "spendwise.json", global = true)]
    pub snapshot: PathBuf,

    /// Transactions export (CSV: date,category_id,category,amount,kind[,wallet_id])
    #[arg(long, default_value = "transactions.csv", global = true)]
    pub transactions: PathBuf,

    /// Analytics thresholds file (TOML)
    ///
    /// Defaults to the per-user override if present, else built-in values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Analyze as of this local time instead of now (YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD)
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze budgets for their current period
    Budgets {
        /// Only budgets in this wallet
        #[arg(short, long)]
        wallet: Option<i64>,

        /// Print only the health line and top recommendations
        #[arg(short, long)]
        quick: bool,
    },

    /// Analyze spending patterns over recent months
    Patterns {
        /// Only transactions in this wallet
        #[arg(short, long)]
        wallet: Option<i64>,
    },

    /// Check whether an expense would push any budget over its limit
    Check {
        /// Category of the expense
        #[arg(short, long)]
        category: i64,

        /// Expense amount
        #[arg(short, long)]
        amount: f64,
    },

    /// Show budget alerts not yet delivered
    Alerts {
        /// File recording alerts already delivered
        #[arg(long, default_value = "alerts.json")]
        ledger: PathBuf,

        /// Show alerts without recording them as delivered
        #[arg(long)]
        dry_run: bool,

        /// Forget every delivered alert
        #[arg(long)]
        reset: bool,
    },

    /// Show or initialize analytics thresholds
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective thresholds as TOML
    Show,

    /// Print the per-user override path
    Path,

    /// Write the built-in thresholds to the per-user override path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
