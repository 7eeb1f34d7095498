//! Historical spending patterns
//!
//! Independent of budgets: works from per-category monthly totals over a
//! trailing window and produces habits, missing purchases, unusual spending,
//! saving opportunities, a month-over-month comparison and smart
//! recommendations.

pub mod analyzer;
pub mod classifier;
pub mod history;
pub mod types;

pub use analyzer::PatternAnalyzer;
pub use classifier::{is_essential, CategoryClass};
pub use history::{normalize_history, MonthlyAmount, YearMonth};
pub use types::{
    HabitPattern, MissingPurchase, MonthlyComparison, PatternAnalysisResult, SavingOpportunity,
    SavingReason, SmartRecommendation, SmartRecommendationType, SmartTopic, SpendingHabit,
    SpendingTrend, UnusualKind, UnusualSpending,
};
