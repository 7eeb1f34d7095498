//! English presentation of analysis results
//!
//! The core only returns typed findings; every sentence the user reads is
//! composed here.

use spendwise_core::alerts::{AlertKind, BudgetAlert};
use spendwise_core::budget::{
    ActionRecommendation, BudgetAnalysisResult, BudgetStatus, HealthStatus, RecommendationType,
    RuleFacts, RuleId, Severity, TriggeredRule,
};
use spendwise_core::patterns::{SavingReason, SmartRecommendation, SmartTopic, SpendingTrend};

/// Format an amount with thousands separators and no decimals
pub fn money(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

pub fn status_icon(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::OnTrack => "✅",
        BudgetStatus::Caution => "🟡",
        BudgetStatus::Warning => "🟠",
        BudgetStatus::Critical => "🔴",
        BudgetStatus::Exceeded => "⛔",
    }
}

pub fn status_label(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::OnTrack => "On track",
        BudgetStatus::Caution => "Caution",
        BudgetStatus::Warning => "Warning",
        BudgetStatus::Critical => "Critical",
        BudgetStatus::Exceeded => "Exceeded",
    }
}

pub fn health_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "Healthy",
        HealthStatus::Moderate => "Moderate",
        HealthStatus::AtRisk => "At risk",
        HealthStatus::Critical => "Critical",
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "ℹ️ ",
        Severity::Warning => "⚠️ ",
        Severity::Critical => "🚨",
    }
}

/// One line describing a triggered rule
pub fn describe_rule(rule: &TriggeredRule) -> String {
    let name = rule.budget.name();
    let detail = match (&rule.rule, &rule.facts) {
        (
            RuleId::BudgetExceeded,
            RuleFacts::Budget {
                remaining, usage_pct, ..
            },
        ) => format!(
            "{} is over budget by {} ({:.0}% used)",
            name,
            money(remaining.abs()),
            usage_pct
        ),
        (RuleId::VelocityCritical | RuleId::VelocityWarning, RuleFacts::Budget { velocity, .. }) => {
            format!("{} is being spent {:.1}x faster than planned", name, velocity)
        }
        (
            RuleId::UsageCritical | RuleId::ApproachingLimit,
            RuleFacts::Budget {
                usage_pct,
                remaining,
                ..
            },
        ) => format!(
            "{} is {:.0}% used, {} left",
            name,
            usage_pct,
            money(*remaining)
        ),
        (RuleId::OnTrack, _) => format!("{} is comfortably on track", name),
        (
            RuleId::PeriodEnding,
            RuleFacts::Budget {
                days_remaining,
                remaining,
                ..
            },
        ) => format!(
            "{} ends in {} day(s) with {} left",
            name,
            days_remaining,
            money(*remaining)
        ),
        (
            RuleId::MultipleBudgetsAtRisk,
            RuleFacts::Overall {
                at_risk,
                exceeded,
                total,
                ..
            },
        ) => format!(
            "{} of {} budgets need attention",
            at_risk + exceeded,
            total
        ),
        (RuleId::FinancesHealthy, RuleFacts::Overall { score, .. }) => {
            format!("Your finances look healthy (score {})", score)
        }
        (rule_id, _) => format!("{}: {}", rule_id.label(), name),
    };
    format!("{} {}", severity_icon(rule.severity), detail)
}

/// One line describing an action recommendation
pub fn describe_recommendation(rec: &ActionRecommendation) -> String {
    let name = rec.budget.name();
    match (rec.rule, rec.kind) {
        (RuleId::BudgetExceeded, _) => format!(
            "Stop spending on {}: you are {} over",
            name,
            money(rec.amount)
        ),
        (RuleId::VelocityCritical, _) => match rec.days {
            Some(days) => format!(
                "Keep {} under {} a day or it runs out in about {} day(s)",
                name,
                money(rec.amount),
                days
            ),
            None => format!("Keep {} under {} a day", name, money(rec.amount)),
        },
        (RuleId::MultipleBudgetsAtRisk, _) => {
            "Several budgets are under pressure: review your spending this period".to_string()
        }
        (_, RecommendationType::ReduceSpending) => {
            format!("Limit {} to {} a day", name, money(rec.amount))
        }
        (_, RecommendationType::Celebrate) => format!(
            "Nice work on {}: {} under plan so far",
            name,
            money(rec.amount)
        ),
        (_, RecommendationType::Redistribute) => format!(
            "{} left in {}: about {} a day, or move it to savings",
            money(rec.amount * rec.days.unwrap_or(1) as f64),
            name,
            money(rec.amount)
        ),
        (_, RecommendationType::Save) => format!("Save {} from {}", money(rec.amount), name),
    }
}

/// Health line plus the three most urgent recommendations
pub fn quick_response(result: &BudgetAnalysisResult) -> String {
    let health = &result.overall_health;
    let mut lines = vec![format!(
        "Financial health: {} ({}/100), {} of {} budgets on track",
        health_label(health.status),
        health.score,
        health.on_track,
        health.total
    )];

    let recs = result.recommendations_by_priority();
    if recs.is_empty() {
        lines.push("Nothing to act on right now.".to_string());
    }
    for rec in recs.into_iter().take(3) {
        lines.push(format!("- {}", describe_recommendation(rec)));
    }

    lines.join("\n")
}

/// One line describing a pattern-based recommendation
pub fn describe_smart(rec: &SmartRecommendation) -> String {
    let category = rec
        .category
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("your spending");

    match &rec.topic {
        SmartTopic::MissingPurchase => format!(
            "You usually spend about {} on {} each month but nothing yet this month",
            money(rec.amount),
            category
        ),
        SmartTopic::Spike { pct_change } => format!(
            "{} is up {:.0}% on your average this month",
            category, pct_change
        ),
        SmartTopic::Drop { pct_change } => format!(
            "{} is down {:.0}% on your average this month",
            category,
            pct_change.abs()
        ),
        SmartTopic::Saving {
            reason: SavingReason::AboveMinimum { minimum },
        } => format!(
            "You could save {} on {} (you managed with {} recently)",
            money(rec.amount),
            category,
            money(*minimum)
        ),
        SmartTopic::Saving {
            reason: SavingReason::RisingTrend { months, .. },
        } => format!(
            "{} has risen for {} months in a row; cutting back could save {}",
            category,
            months,
            money(rec.amount)
        ),
        SmartTopic::GoodHabits { habits_kept } => format!(
            "You are keeping {} spending habits within their usual range",
            habits_kept
        ),
        SmartTopic::MonthEnd { days_left } => format!(
            "{} day(s) left this month and no {} yet (usually about {})",
            days_left,
            category,
            money(rec.amount)
        ),
    }
}

pub fn trend_label(trend: SpendingTrend) -> &'static str {
    match trend {
        SpendingTrend::Increasing => "📈 increasing",
        SpendingTrend::Decreasing => "📉 decreasing",
        SpendingTrend::Stable => "➡️  stable",
    }
}

/// One line describing an alert about to be delivered
pub fn describe_alert(alert: &BudgetAlert) -> String {
    let name = alert.budget.name();
    match (alert.kind, &alert.facts) {
        (AlertKind::BudgetExceeded, RuleFacts::Budget { remaining, .. }) => {
            format!("{} budget exceeded by {}", name, money(remaining.abs()))
        }
        (AlertKind::BudgetCritical, RuleFacts::Budget { usage_pct, .. }) => format!(
            "{} budget critical: {:.0}% used, keep under {} a day",
            name,
            usage_pct,
            money(alert.recommended_daily_limit)
        ),
        (AlertKind::BudgetWarning, RuleFacts::Budget { usage_pct, .. }) => {
            format!("{} budget needs attention: {:.0}% used", name, usage_pct)
        }
        (AlertKind::ThresholdReached, RuleFacts::Budget { usage_pct, .. }) => {
            format!("{} budget reached your alert level: {:.0}% used", name, usage_pct)
        }
        (AlertKind::OverallCritical, RuleFacts::Overall { score, .. }) => {
            format!("Overall financial health is critical (score {})", score)
        }
        (kind, _) => format!("{}: {}", kind, name),
    }
}
