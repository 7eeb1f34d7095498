//! Spendwise Core Library
//!
//! Budget analytics for the Spendwise personal finance tool:
//! - Period resolution for daily, weekly, monthly, yearly and custom budgets
//! - Per-budget insights (usage, pace, status, trend)
//! - Rule chain producing triggered rules and recommendations
//! - Overall financial health score
//! - Historical spending patterns over a trailing window of months
//! - Alert planning and expense pre-checks
//!
//! Everything here is a pure computation over caller-supplied snapshots. The
//! caller loads budgets and transactions, sums spending, and pins "now".

pub mod alerts;
pub mod budget;
pub mod config;
pub mod error;
pub mod expense;
pub mod models;
pub mod patterns;
pub mod period;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

pub use alerts::{plan_alerts, AlertKind, AlertLedger, AlertPriority, BudgetAlert};
pub use budget::{
    ActionRecommendation, AnalysisWarning, BudgetAnalysisResult, BudgetAnalyzer, BudgetInsight,
    BudgetRef, BudgetStatus, HealthStatus, OverallFinancialHealth, Priority, RecommendationType,
    RuleChain, RuleId, Severity, SkippedBudget, Trend, TriggeredRule,
};
pub use config::{AnalyticsConfig, BudgetThresholds, HealthThresholds, PatternThresholds};
pub use error::{Error, Result};
pub use expense::{check_expense, ExceedWarning};
pub use models::{Budget, BudgetId, Category, CategoryId, ExpenseDraft, PeriodType};
pub use patterns::{
    MonthlyAmount, MonthlyComparison, PatternAnalysisResult, PatternAnalyzer, SmartRecommendation,
    YearMonth,
};
pub use period::{PeriodDays, PeriodSpec, PeriodWindow};

/// Analyze budgets with default thresholds
pub fn analyze_budgets(
    budgets: &[Budget],
    spent: &BTreeMap<BudgetId, f64>,
    category_names: &BTreeMap<CategoryId, String>,
    now: NaiveDateTime,
) -> BudgetAnalysisResult {
    BudgetAnalyzer::new().analyze(budgets, spent, category_names, now)
}

/// Analyze spending patterns with default thresholds
pub fn analyze_patterns(
    current_month: &BTreeMap<Category, f64>,
    history: &BTreeMap<Category, Vec<MonthlyAmount>>,
    now: NaiveDateTime,
) -> PatternAnalysisResult {
    PatternAnalyzer::new().analyze(current_month, history, now)
}

/// The local wall-clock time, read once per top-level operation
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
