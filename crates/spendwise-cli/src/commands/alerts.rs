//! Alerts command
//!
//! Delivery is printing; the ledger file records what was already shown so
//! the same alert is not repeated within a period.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use spendwise_core::alerts::{plan_alerts, AlertLedger, AlertPriority, BudgetAlert};

use super::{budgets, print_json, Context};
use crate::render::describe_alert;

pub fn load_ledger(path: &Path) -> Result<AlertLedger> {
    if !path.exists() {
        return Ok(AlertLedger::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid alert ledger {}", path.display()))
}

pub fn save_ledger(path: &Path, ledger: &AlertLedger) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Alerts not yet delivered; records them unless `dry_run`
pub fn pending_alerts(ctx: &Context, ledger_path: &Path, dry_run: bool) -> Result<Vec<BudgetAlert>> {
    let result = budgets::analyze(ctx, None)?;
    let mut ledger = load_ledger(ledger_path)?;

    let alerts = ledger.retain_unsent(plan_alerts(&result));
    if !dry_run && !alerts.is_empty() {
        ledger.mark_sent(&alerts);
        save_ledger(ledger_path, &ledger)?;
        tracing::debug!(sent = alerts.len(), total = ledger.len(), "Recorded alerts");
    }
    Ok(alerts)
}

pub fn cmd_alerts(ctx: &Context, ledger_path: &Path, dry_run: bool, reset: bool) -> Result<()> {
    if reset {
        let mut ledger = load_ledger(ledger_path)?;
        let forgotten = ledger.len();
        ledger.clear();
        save_ledger(ledger_path, &ledger)?;
        println!("🧹 Forgot {} delivered alert(s)", forgotten);
        return Ok(());
    }

    let alerts = pending_alerts(ctx, ledger_path, dry_run)?;

    if ctx.json {
        return print_json(&alerts);
    }

    if alerts.is_empty() {
        println!("🔕 No new alerts.");
        return Ok(());
    }

    for alert in &alerts {
        let icon = match alert.priority {
            AlertPriority::High => "🚨",
            AlertPriority::Default => "🔔",
        };
        println!("{} {}", icon, describe_alert(alert));
    }
    Ok(())
}
