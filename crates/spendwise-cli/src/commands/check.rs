//! Expense pre-check command

use anyhow::{Context as _, Result};
use spendwise_core::expense::{check_expense, ExceedWarning};
use spendwise_core::models::{CategoryId, ExpenseDraft};

use super::{print_json, Context};
use crate::render::money;

/// Budgets the expense would exceed
pub fn exceeded_budgets(
    ctx: &Context,
    category_id: CategoryId,
    amount: f64,
) -> Result<Vec<ExceedWarning>> {
    let store = ctx.open_store()?;
    let now = ctx.now()?;

    let spent = store.spent_by_budget(&store.budgets, now);
    let draft = ExpenseDraft {
        category_id,
        amount,
    };
    check_expense(&store.budgets, &spent, &draft, now).context("Cannot check expense")
}

pub fn cmd_check(ctx: &Context, category_id: CategoryId, amount: f64) -> Result<()> {
    let warnings = exceeded_budgets(ctx, category_id, amount)?;

    if ctx.json {
        return print_json(&warnings);
    }

    if warnings.is_empty() {
        println!("✅ {} fits within every budget.", money(amount));
        return Ok(());
    }

    println!("⚠️  {} would exceed:", money(amount));
    for w in &warnings {
        println!(
            "   {} - {} of {} ({} over)",
            w.budget_name,
            money(w.new_total),
            money(w.budget_amount),
            money(w.overshoot)
        );
    }
    Ok(())
}
