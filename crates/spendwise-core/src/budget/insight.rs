//! Budget Insight Calculator
//!
//! Derives usage, pace and status for one budget from its spent amount and
//! the resolved period.

use chrono::NaiveDateTime;

use super::types::{BudgetInsight, BudgetStatus, Trend};
use crate::config::BudgetThresholds;
use crate::error::{Error, Result};
use crate::models::Budget;
use crate::period;

impl BudgetStatus {
    /// First matching level wins: exceeded, critical, warning, caution, on track
    pub fn classify(usage_pct: f64, velocity: f64, t: &BudgetThresholds) -> Self {
        if usage_pct >= t.usage_exceeded {
            BudgetStatus::Exceeded
        } else if usage_pct >= t.usage_critical || velocity >= t.velocity_critical {
            BudgetStatus::Critical
        } else if usage_pct >= t.usage_warning || velocity >= t.velocity_warning {
            BudgetStatus::Warning
        } else if usage_pct >= t.usage_caution {
            BudgetStatus::Caution
        } else {
            BudgetStatus::OnTrack
        }
    }
}

impl Trend {
    pub fn classify(velocity: f64, t: &BudgetThresholds) -> Self {
        if velocity <= t.velocity_good {
            Trend::Improving
        } else if velocity >= t.velocity_warning {
            Trend::Worsening
        } else {
            Trend::Stable
        }
    }
}

/// Compute the insight for one budget
///
/// Budgets with a non-positive or non-finite amount cannot be tracked and are
/// rejected with [`Error::InvalidBudgetAmount`]. A negative or non-finite spent
/// amount is rejected as [`Error::InvalidData`].
pub fn calculate_insight(
    budget: &Budget,
    spent: f64,
    category_name: Option<&str>,
    now: NaiveDateTime,
    thresholds: &BudgetThresholds,
) -> Result<BudgetInsight> {
    if !budget.amount.is_finite() || budget.amount <= 0.0 {
        return Err(Error::InvalidBudgetAmount {
            budget_id: budget.id,
            amount: budget.amount,
        });
    }
    if !spent.is_finite() || spent < 0.0 {
        return Err(Error::InvalidData(format!(
            "spent amount for budget {} must be a non-negative number, got {}",
            budget.id, spent
        )));
    }

    let (window, days) = period::resolve(&budget.period_spec(), now);

    let remaining = budget.amount - spent;
    let usage_pct = spent / budget.amount * 100.0;
    let daily_average = spent / days.elapsed as f64;
    let recommended_daily_limit = if days.remaining > 0 {
        remaining / days.remaining as f64
    } else {
        0.0
    };

    let expected_spent_by_now = budget.amount / days.total as f64 * days.elapsed as f64;
    let velocity = if expected_spent_by_now > 0.0 {
        spent / expected_spent_by_now
    } else {
        1.0
    };

    let status = BudgetStatus::classify(usage_pct, velocity, thresholds);
    let trend = Trend::classify(velocity, thresholds);

    Ok(BudgetInsight {
        budget_id: budget.id,
        budget_name: budget.name.clone(),
        period_type: budget.period_type,
        category_id: budget.category_id,
        category_name: category_name.map(str::to_string),
        budget_amount: budget.amount,
        spent,
        remaining,
        usage_pct,
        days_elapsed: days.elapsed,
        days_remaining: days.remaining,
        total_days: days.total,
        daily_average,
        recommended_daily_limit,
        expected_spent_by_now,
        velocity,
        status,
        trend,
        alert_threshold_reached: usage_pct >= budget.alert_threshold * 100.0,
        period: window,
        period_degraded: window.degraded,
    })
}
