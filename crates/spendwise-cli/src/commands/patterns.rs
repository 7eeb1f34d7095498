//! Spending pattern command

use anyhow::Result;
use spendwise_core::patterns::{PatternAnalysisResult, PatternAnalyzer};

use super::{print_json, truncate, Context};
use crate::render::{describe_smart, money, trend_label};

/// Run the pattern analysis over the configured window for one wallet (or all)
pub fn analyze(ctx: &Context, wallet: Option<i64>) -> Result<PatternAnalysisResult> {
    let config = ctx.load_config()?;
    let store = ctx.open_store()?;
    let now = ctx.now()?;

    let (current, history) = store.monthly_totals(now, config.patterns.window_months, wallet);
    Ok(PatternAnalyzer::with_config(&config).analyze(&current, &history, now))
}

pub fn cmd_patterns(ctx: &Context, wallet: Option<i64>) -> Result<()> {
    let result = analyze(ctx, wallet)?;

    if ctx.json {
        return print_json(&result);
    }

    let cmp = &result.monthly_comparison;
    println!();
    println!("📈 Spending Patterns ({})", result.reference_month);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   This month: {}  ·  Last month: {}  ·  Average: {}",
        money(cmp.this_month),
        money(cmp.last_month),
        money(cmp.average_monthly)
    );
    println!(
        "   {:+.0}% vs last month, {:+.0}% vs average, {}",
        cmp.pct_vs_last_month,
        cmp.pct_vs_average,
        trend_label(cmp.trend)
    );

    if !result.habits.is_empty() {
        println!();
        println!("   {:20} │ {:>12} │ {:>6} │ {}", "Habit", "Average", "Months", "Pattern");
        println!("   ─────────────────────┼──────────────┼────────┼───────────");
        for habit in &result.habits {
            println!(
                "   {:20} │ {:>12} │ {:>6} │ {}{}",
                truncate(&habit.category.name, 20),
                money(habit.average_amount),
                habit.occurrences,
                habit.pattern,
                if habit.essential { " (essential)" } else { "" }
            );
        }
    }

    if !result.unusual_spendings.is_empty() {
        println!();
        println!("   Unusual this month:");
        for u in &result.unusual_spendings {
            println!(
                "   {} {} {} vs usual {} ({:+.0}%)",
                if u.pct_change > 0.0 { "⬆️ " } else { "⬇️ " },
                u.category.name,
                money(u.current_amount),
                money(u.average_amount),
                u.pct_change
            );
        }
    }

    if !result.saving_opportunities.is_empty() {
        println!();
        println!(
            "   Potential savings: {}",
            money(result.total_potential_saving())
        );
    }

    if result.recommendations.is_empty() {
        println!();
        println!("   No suggestions this month.");
    } else {
        println!();
        println!("   Suggestions:");
        for rec in &result.recommendations {
            println!("   [{}] {}", rec.priority, describe_smart(rec));
        }
    }

    println!();
    Ok(())
}
