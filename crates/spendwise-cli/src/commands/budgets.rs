//! Budget analysis command

use anyhow::Result;
use spendwise_core::budget::{AnalysisWarning, BudgetAnalysisResult, BudgetAnalyzer};

use super::{print_json, truncate, Context};
use crate::render::{
    describe_recommendation, describe_rule, health_label, money, quick_response, status_icon,
    status_label,
};

/// Run the budget analysis for one wallet (or all budgets)
pub fn analyze(ctx: &Context, wallet: Option<i64>) -> Result<BudgetAnalysisResult> {
    let config = ctx.load_config()?;
    let store = ctx.open_store()?;
    let now = ctx.now()?;

    let budgets = store.budgets_in_wallet(wallet);
    let spent = store.spent_by_budget(&budgets, now);
    let category_names = store.category_names();

    Ok(BudgetAnalyzer::with_config(&config).analyze(&budgets, &spent, &category_names, now))
}

pub fn cmd_budgets(ctx: &Context, wallet: Option<i64>, quick: bool) -> Result<()> {
    let result = analyze(ctx, wallet)?;

    if ctx.json {
        return print_json(&result);
    }
    if quick {
        println!("{}", quick_response(&result));
        return Ok(());
    }

    print_report(&result);
    Ok(())
}

fn print_report(result: &BudgetAnalysisResult) {
    let health = &result.overall_health;

    println!();
    println!("💰 Budget Report ({})", result.analyzed_at.format("%Y-%m-%d %H:%M"));
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Health: {} ({}/100)  ·  {} on track, {} at risk, {} exceeded",
        health_label(health.status),
        health.score,
        health.on_track,
        health.at_risk,
        health.exceeded
    );
    println!();

    if result.insights.is_empty() {
        println!("   No budgets to analyze.");
    } else {
        println!(
            "   {:2} {:20} │ {:>12} │ {:>12} │ {:>6} │ {:>5} │ {}",
            "", "Budget", "Spent", "Budget", "Used", "Pace", "Days left"
        );
        println!("   ────────────────────────┼──────────────┼──────────────┼────────┼───────┼──────────");
        for insight in &result.insights {
            println!(
                "   {} {:20} │ {:>12} │ {:>12} │ {:>5.0}% │ {:>5.2} │ {}",
                status_icon(insight.status),
                truncate(insight.display_name(), 20),
                money(insight.spent),
                money(insight.budget_amount),
                insight.usage_pct,
                insight.velocity,
                insight.days_remaining
            );
        }
        println!();
        for insight in result.insights.iter().filter(|i| i.days_remaining > 0) {
            if insight.remaining > 0.0 {
                println!(
                    "   {} ({}): up to {} a day for the rest of the period",
                    insight.display_name(),
                    status_label(insight.status),
                    money(insight.recommended_daily_limit)
                );
            }
        }
    }

    if !result.triggered_rules.is_empty() {
        println!();
        println!("   Findings:");
        for rule in &result.triggered_rules {
            println!("   {}", describe_rule(rule));
        }
    }

    let recs = result.recommendations_by_priority();
    if !recs.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in recs {
            println!("   [{}] {}", rec.priority, describe_recommendation(rec));
        }
    }

    if !result.skipped.is_empty() || !result.warnings.is_empty() {
        println!();
        for skipped in &result.skipped {
            println!(
                "   ⚠️  Skipped {} (#{}): {}",
                skipped.budget_name, skipped.budget_id, skipped.reason
            );
        }
        for warning in &result.warnings {
            match warning {
                AnalysisWarning::DegradedPeriod { budget_id } => println!(
                    "   ⚠️  Budget #{} has unreadable custom dates; pace figures are unreliable",
                    budget_id
                ),
            }
        }
    }

    println!();
}
