//! Alert planning
//!
//! Derives notification candidates from a budget analysis. Delivery and the
//! record of what was already sent belong to the caller: the ledger here is a
//! plain value the caller loads, consults and saves.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::budget::{
    BudgetAnalysisResult, BudgetInsight, BudgetRef, BudgetStatus, HealthStatus,
    OverallFinancialHealth, RuleFacts,
};

/// Delivery priority of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    High,
    Default,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::High => "high",
            AlertPriority::Default => "default",
        }
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BudgetExceeded,
    BudgetCritical,
    BudgetWarning,
    /// Usage crossed the budget's own alert threshold while otherwise fine
    ThresholdReached,
    OverallCritical,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::BudgetExceeded => "budget_exceeded",
            AlertKind::BudgetCritical => "budget_critical",
            AlertKind::BudgetWarning => "budget_warning",
            AlertKind::ThresholdReached => "threshold_reached",
            AlertKind::OverallCritical => "overall_critical",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification the caller may deliver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    /// De-duplication key, stable across analyses of the same period and
    /// distinct once a new period starts
    pub key: String,
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub budget: BudgetRef,
    pub facts: RuleFacts,
    /// Suggested daily limit for budget alerts, 0 otherwise
    pub recommended_daily_limit: f64,
}

/// Key for a budget alert: one per (budget, status, period) triple
pub fn budget_alert_key(budget_id: i64, status: &str, period_start: NaiveDate) -> String {
    format!("budget:{}:{}:{}", budget_id, status, period_start.format("%Y-%m-%d"))
}

/// Key for the overall alert: one per calendar month
pub fn overall_alert_key(at: NaiveDateTime) -> String {
    format!("overall:critical:{}", at.format("%Y-%m"))
}

/// Notification candidates for an analysis, in budget order then overall
pub fn plan_alerts(result: &BudgetAnalysisResult) -> Vec<BudgetAlert> {
    let mut alerts: Vec<BudgetAlert> = result.insights.iter().filter_map(budget_alert).collect();

    if result.overall_health.status == HealthStatus::Critical {
        alerts.push(overall_alert(&result.overall_health, result.analyzed_at));
    }

    tracing::debug!(count = alerts.len(), "Planned alerts");
    alerts
}

fn budget_alert(insight: &BudgetInsight) -> Option<BudgetAlert> {
    let (kind, priority, key_status) = match insight.status {
        BudgetStatus::Exceeded => (AlertKind::BudgetExceeded, AlertPriority::High, "exceeded"),
        BudgetStatus::Critical => (AlertKind::BudgetCritical, AlertPriority::High, "critical"),
        BudgetStatus::Warning => (AlertKind::BudgetWarning, AlertPriority::Default, "warning"),
        BudgetStatus::Caution | BudgetStatus::OnTrack if insight.alert_threshold_reached => {
            (AlertKind::ThresholdReached, AlertPriority::Default, "threshold")
        }
        BudgetStatus::Caution | BudgetStatus::OnTrack => return None,
    };

    Some(BudgetAlert {
        key: budget_alert_key(insight.budget_id, key_status, insight.period.start.date()),
        kind,
        priority,
        budget: insight.budget_ref(),
        facts: RuleFacts::Budget {
            budget_amount: insight.budget_amount,
            spent: insight.spent,
            remaining: insight.remaining,
            usage_pct: insight.usage_pct,
            velocity: insight.velocity,
            days_remaining: insight.days_remaining,
        },
        recommended_daily_limit: insight.recommended_daily_limit,
    })
}

fn overall_alert(health: &OverallFinancialHealth, at: NaiveDateTime) -> BudgetAlert {
    BudgetAlert {
        key: overall_alert_key(at),
        kind: AlertKind::OverallCritical,
        priority: AlertPriority::High,
        budget: BudgetRef::Overall,
        facts: RuleFacts::Overall {
            at_risk: health.at_risk,
            exceeded: health.exceeded,
            total: health.total,
            score: health.score,
        },
        recommended_daily_limit: 0.0,
    }
}

/// Keys of alerts already delivered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertLedger {
    sent: BTreeSet<String>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sent(&self, key: &str) -> bool {
        self.sent.contains(key)
    }

    /// Drop alerts whose key was already delivered
    pub fn retain_unsent(&self, alerts: Vec<BudgetAlert>) -> Vec<BudgetAlert> {
        alerts
            .into_iter()
            .filter(|a| !self.is_sent(&a.key))
            .collect()
    }

    pub fn mark_sent(&mut self, alerts: &[BudgetAlert]) {
        self.sent.extend(alerts.iter().map(|a| a.key.clone()));
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.sent.clear();
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}
