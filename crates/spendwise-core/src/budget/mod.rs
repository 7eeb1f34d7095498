//! Budget analysis
//!
//! Turns budgets and their spent amounts into per-budget insights, triggered
//! rules, recommendations and an overall health score.
//!
//! ## Pipeline
//!
//! - **Period Resolver** (`crate::period`) - active window and day counts
//! - **Insight Calculator** - usage, pace, status and trend per budget
//! - **Rule Chain** - first-match rule per budget, plus the period-ending rule
//! - **Health Scorer** - 0-100 score over all insights
//! - **Cross-budget rules** - evaluated once against the health summary
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::budget::BudgetAnalyzer;
//!
//! let analyzer = BudgetAnalyzer::with_config(&config);
//! let result = analyzer.analyze(&budgets, &spent, &category_names, now);
//! ```

pub mod engine;
pub mod health;
pub mod insight;
pub mod rules;
pub mod types;

pub use engine::BudgetAnalyzer;
pub use insight::calculate_insight;
pub use rules::{
    cross_budget_rules, days_until_exceeded, BudgetRule, RuleChain, RuleFiring,
};
pub use types::{
    ActionRecommendation, AnalysisWarning, BudgetAnalysisResult, BudgetInsight, BudgetRef,
    BudgetStatus, HealthStatus, OverallFinancialHealth, Priority, RecommendationType, RuleFacts,
    RuleId, Severity, SkippedBudget, Trend, TriggeredRule,
};
