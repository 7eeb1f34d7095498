//! Result types for historical pattern analysis

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::history::YearMonth;
use crate::budget::Priority;
use crate::models::Category;

/// How regularly a habit recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitPattern {
    Monthly,
    Frequent,
    Occasional,
}

impl HabitPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitPattern::Monthly => "monthly",
            HabitPattern::Frequent => "frequent",
            HabitPattern::Occasional => "occasional",
        }
    }
}

impl fmt::Display for HabitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category the user spends on regularly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingHabit {
    pub category: Category,
    /// Average over the months with spending
    pub average_amount: f64,
    pub occurrences: usize,
    /// occurrences / months analyzed
    pub frequency: f64,
    pub pattern: HabitPattern,
    pub essential: bool,
}

/// A regular discretionary purchase with nothing spent this month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingPurchase {
    pub category: Category,
    pub usual_amount: f64,
    pub months_seen: usize,
    pub last_seen: YearMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusualKind {
    Spike,
    Drop,
}

impl UnusualKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnusualKind::Spike => "spike",
            UnusualKind::Drop => "drop",
        }
    }
}

impl fmt::Display for UnusualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current-month spend far from a category's average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusualSpending {
    pub category: Category,
    pub current_amount: f64,
    pub average_amount: f64,
    /// (current - average) / average * 100
    pub pct_change: f64,
    pub kind: UnusualKind,
}

/// Why a saving opportunity was raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavingReason {
    /// Spending well above the cheapest recent month
    AboveMinimum { minimum: f64 },
    /// Spending grew every month across the recorded history
    RisingTrend { months: usize, first_amount: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingOpportunity {
    pub category: Category,
    pub current_amount: f64,
    pub potential_saving: f64,
    pub reason: SavingReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartRecommendationType {
    Spend,
    Save,
    Warning,
    Celebrate,
}

impl SmartRecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmartRecommendationType::Spend => "spend",
            SmartRecommendationType::Save => "save",
            SmartRecommendationType::Warning => "warning",
            SmartRecommendationType::Celebrate => "celebrate",
        }
    }
}

impl fmt::Display for SmartRecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finding a smart recommendation was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmartTopic {
    MissingPurchase,
    Spike { pct_change: f64 },
    Drop { pct_change: f64 },
    Saving { reason: SavingReason },
    GoodHabits { habits_kept: usize },
    MonthEnd { days_left: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartRecommendation {
    pub kind: SmartRecommendationType,
    pub priority: Priority,
    pub topic: SmartTopic,
    /// None for recommendations about overall behavior
    pub category: Option<Category>,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl SpendingTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingTrend::Increasing => "increasing",
            SpendingTrend::Decreasing => "decreasing",
            SpendingTrend::Stable => "stable",
        }
    }
}

impl fmt::Display for SpendingTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// This month against last month and the recent average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    pub this_month: f64,
    pub last_month: f64,
    /// Average over the `window_months` full months before this one
    pub average_monthly: f64,
    /// 0 when last month had no spending
    pub pct_vs_last_month: f64,
    /// 0 when the average is 0
    pub pct_vs_average: f64,
    pub trend: SpendingTrend,
}

/// Everything produced by one pattern analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysisResult {
    pub analyzed_at: NaiveDateTime,
    pub reference_month: YearMonth,
    pub habits: Vec<SpendingHabit>,
    pub missing_purchases: Vec<MissingPurchase>,
    pub unusual_spendings: Vec<UnusualSpending>,
    pub saving_opportunities: Vec<SavingOpportunity>,
    pub recommendations: Vec<SmartRecommendation>,
    pub monthly_comparison: MonthlyComparison,
}

impl PatternAnalysisResult {
    /// Total potential saving across all opportunities
    pub fn total_potential_saving(&self) -> f64 {
        self.saving_opportunities
            .iter()
            .map(|o| o.potential_saving)
            .sum()
    }
}
