//! Core types for budget analysis

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{BudgetId, CategoryId, PeriodType};
use crate::period::PeriodWindow;

/// Where a budget stands in its current period
///
/// Variants are ordered from healthiest to worst so statuses can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    /// Half the budget used, pace still fine
    Caution,
    Warning,
    Critical,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on_track",
            BudgetStatus::Caution => "caution",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Critical => "critical",
            BudgetStatus::Exceeded => "exceeded",
        }
    }

    /// Counted as on track by the health scorer
    pub fn is_on_track(&self) -> bool {
        matches!(self, BudgetStatus::OnTrack | BudgetStatus::Caution)
    }

    /// Counted as at risk by the health scorer
    pub fn is_at_risk(&self) -> bool {
        matches!(self, BudgetStatus::Warning | BudgetStatus::Critical)
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BudgetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_track" => Ok(BudgetStatus::OnTrack),
            "caution" => Ok(BudgetStatus::Caution),
            "warning" => Ok(BudgetStatus::Warning),
            "critical" => Ok(BudgetStatus::Critical),
            "exceeded" => Ok(BudgetStatus::Exceeded),
            _ => Err(format!("Unknown budget status: {}", s)),
        }
    }
}

/// Direction of spending pace relative to a linear plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Worsening,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Worsening => "worsening",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a triggered rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Warning => 2,
            Severity::Critical => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a budget recommendation asks the user to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    ReduceSpending,
    Redistribute,
    Celebrate,
    Save,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::ReduceSpending => "reduce_spending",
            RecommendationType::Redistribute => "redistribute",
            RecommendationType::Celebrate => "celebrate",
            RecommendationType::Save => "save",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of every rule the engine can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    BudgetExceeded,
    VelocityCritical,
    UsageCritical,
    ApproachingLimit,
    VelocityWarning,
    OnTrack,
    PeriodEnding,
    MultipleBudgetsAtRisk,
    FinancesHealthy,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::BudgetExceeded => "BUDGET_EXCEEDED",
            RuleId::VelocityCritical => "VELOCITY_CRITICAL",
            RuleId::UsageCritical => "USAGE_CRITICAL",
            RuleId::ApproachingLimit => "APPROACHING_LIMIT",
            RuleId::VelocityWarning => "VELOCITY_WARNING",
            RuleId::OnTrack => "ON_TRACK",
            RuleId::PeriodEnding => "PERIOD_ENDING",
            RuleId::MultipleBudgetsAtRisk => "MULTIPLE_BUDGETS_AT_RISK",
            RuleId::FinancesHealthy => "FINANCES_HEALTHY",
        }
    }

    /// Short label tag for the rule
    pub fn label(&self) -> &'static str {
        match self {
            RuleId::BudgetExceeded => "Budget exceeded",
            RuleId::VelocityCritical => "Spending too fast",
            RuleId::UsageCritical => "Budget almost used up",
            RuleId::ApproachingLimit => "Approaching limit",
            RuleId::VelocityWarning => "Spending faster than planned",
            RuleId::OnTrack => "On track",
            RuleId::PeriodEnding => "Period ending",
            RuleId::MultipleBudgetsAtRisk => "Multiple budgets at risk",
            RuleId::FinancesHealthy => "Finances healthy",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUDGET_EXCEEDED" => Ok(RuleId::BudgetExceeded),
            "VELOCITY_CRITICAL" => Ok(RuleId::VelocityCritical),
            "USAGE_CRITICAL" => Ok(RuleId::UsageCritical),
            "APPROACHING_LIMIT" => Ok(RuleId::ApproachingLimit),
            "VELOCITY_WARNING" => Ok(RuleId::VelocityWarning),
            "ON_TRACK" => Ok(RuleId::OnTrack),
            "PERIOD_ENDING" => Ok(RuleId::PeriodEnding),
            "MULTIPLE_BUDGETS_AT_RISK" => Ok(RuleId::MultipleBudgetsAtRisk),
            "FINANCES_HEALTHY" => Ok(RuleId::FinancesHealthy),
            _ => Err(format!("Unknown rule: {}", s)),
        }
    }
}

/// The budget a rule or recommendation is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum BudgetRef {
    Budget { id: BudgetId, name: String },
    /// Cross-budget findings
    Overall,
}

impl BudgetRef {
    pub fn budget_id(&self) -> Option<BudgetId> {
        match self {
            BudgetRef::Budget { id, .. } => Some(*id),
            BudgetRef::Overall => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BudgetRef::Budget { name, .. } => name,
            BudgetRef::Overall => "overall",
        }
    }
}

/// Per-budget analysis for the current period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInsight {
    pub budget_id: BudgetId,
    pub budget_name: String,
    pub period_type: PeriodType,
    /// None for global budgets
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub budget_amount: f64,
    pub spent: f64,
    /// May be negative once the budget is exceeded
    pub remaining: f64,
    pub usage_pct: f64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub total_days: i64,
    pub daily_average: f64,
    /// Zero when no days remain
    pub recommended_daily_limit: f64,
    pub expected_spent_by_now: f64,
    pub velocity: f64,
    pub status: BudgetStatus,
    pub trend: Trend,
    /// Usage has reached the budget's own alert threshold
    pub alert_threshold_reached: bool,
    pub period: PeriodWindow,
    /// The custom period could not be parsed; day counts are a 1-day fallback
    pub period_degraded: bool,
}

impl BudgetInsight {
    pub fn is_category_specific(&self) -> bool {
        self.category_id.is_some()
    }

    /// Category name for category budgets, otherwise the budget's own name
    pub fn display_name(&self) -> &str {
        self.category_name.as_deref().unwrap_or(&self.budget_name)
    }

    pub fn budget_ref(&self) -> BudgetRef {
        BudgetRef::Budget {
            id: self.budget_id,
            name: self.display_name().to_string(),
        }
    }
}

/// Numbers behind a triggered rule, for whoever composes the message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleFacts {
    Budget {
        budget_amount: f64,
        spent: f64,
        remaining: f64,
        usage_pct: f64,
        velocity: f64,
        days_remaining: i64,
    },
    Overall {
        at_risk: usize,
        exceeded: usize,
        total: usize,
        score: u8,
    },
}

/// A rule that fired during analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredRule {
    pub rule: RuleId,
    pub label: String,
    pub severity: Severity,
    pub budget: BudgetRef,
    pub facts: RuleFacts,
}

/// An actionable recommendation produced alongside a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecommendation {
    pub kind: RecommendationType,
    pub priority: Priority,
    /// Rule this recommendation was produced by
    pub rule: RuleId,
    /// Suggested amount (overshoot, daily limit, surplus...), 0 when not applicable
    pub amount: f64,
    pub budget: BudgetRef,
    /// Days until exceeded, or days left in the period, where relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

/// Categorical financial health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Moderate,
    AtRisk,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Moderate => "moderate",
            HealthStatus::AtRisk => "at_risk",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate health across all analyzed budgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallFinancialHealth {
    pub status: HealthStatus,
    /// 0-100
    pub score: u8,
    pub on_track: usize,
    pub at_risk: usize,
    pub exceeded: usize,
    pub total: usize,
}

/// A budget left out of the analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBudget {
    pub budget_id: BudgetId,
    pub budget_name: String,
    pub reason: String,
}

/// Non-fatal issues found while analyzing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// Custom period dates could not be parsed; velocity for this budget is unreliable
    DegradedPeriod { budget_id: BudgetId },
}

/// Everything produced by one budget analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAnalysisResult {
    pub analyzed_at: NaiveDateTime,
    pub insights: Vec<BudgetInsight>,
    pub triggered_rules: Vec<TriggeredRule>,
    pub recommendations: Vec<ActionRecommendation>,
    pub overall_health: OverallFinancialHealth,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedBudget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl BudgetAnalysisResult {
    /// Insight for a budget, if it was analyzed
    pub fn insight(&self, budget_id: BudgetId) -> Option<&BudgetInsight> {
        self.insights.iter().find(|i| i.budget_id == budget_id)
    }

    /// Recommendations ordered by priority, stable within the same priority
    pub fn recommendations_by_priority(&self) -> Vec<&ActionRecommendation> {
        let mut recs: Vec<&ActionRecommendation> = self.recommendations.iter().collect();
        recs.sort_by_key(|r| std::cmp::Reverse(r.priority.rank()));
        recs
    }
}
