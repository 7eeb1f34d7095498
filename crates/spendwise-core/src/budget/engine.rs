//! Budget analyzer - runs insight calculation, the rule chain and health scoring

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::insight::calculate_insight;
use super::rules::{cross_budget_rules, RuleChain, RuleFiring};
use super::types::{AnalysisWarning, BudgetAnalysisResult, OverallFinancialHealth, SkippedBudget};
use crate::config::{AnalyticsConfig, BudgetThresholds, HealthThresholds};
use crate::models::{Budget, BudgetId, CategoryId};

/// Analyzes a set of budgets for one scope (e.g. one wallet)
pub struct BudgetAnalyzer {
    budget: BudgetThresholds,
    health: HealthThresholds,
    rules: RuleChain,
}

impl Default for BudgetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetAnalyzer {
    /// Analyzer with default thresholds and the built-in rule chain
    pub fn new() -> Self {
        Self {
            budget: BudgetThresholds::default(),
            health: HealthThresholds::default(),
            rules: RuleChain::new(),
        }
    }

    pub fn with_config(config: &AnalyticsConfig) -> Self {
        Self {
            budget: config.budget.clone(),
            health: config.health.clone(),
            rules: RuleChain::new(),
        }
    }

    /// Replace the per-budget rule chain
    pub fn with_rules(mut self, rules: RuleChain) -> Self {
        self.rules = rules;
        self
    }

    /// Analyze every budget as of `now`
    ///
    /// Budgets missing from `spent` are treated as having no spending. Budgets
    /// that cannot be analyzed are reported in `skipped`; the rest of the batch
    /// is unaffected.
    pub fn analyze(
        &self,
        budgets: &[Budget],
        spent: &BTreeMap<BudgetId, f64>,
        category_names: &BTreeMap<CategoryId, String>,
        now: NaiveDateTime,
    ) -> BudgetAnalysisResult {
        let mut insights = vec![];
        let mut firings: Vec<RuleFiring> = vec![];
        let mut skipped = vec![];
        let mut warnings = vec![];

        for budget in budgets {
            let amount_spent = spent.get(&budget.id).copied().unwrap_or(0.0);
            let category_name = budget
                .category_id
                .and_then(|id| category_names.get(&id))
                .map(String::as_str);

            let insight =
                match calculate_insight(budget, amount_spent, category_name, now, &self.budget) {
                    Ok(insight) => insight,
                    Err(e) => {
                        tracing::warn!(budget_id = budget.id, error = %e, "Skipping budget");
                        skipped.push(SkippedBudget {
                            budget_id: budget.id,
                            budget_name: budget.name.clone(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };

            if insight.period_degraded {
                tracing::warn!(
                    budget_id = budget.id,
                    "Custom period dates unreadable, using a one-day period"
                );
                warnings.push(AnalysisWarning::DegradedPeriod {
                    budget_id: budget.id,
                });
            }

            firings.extend(self.rules.evaluate(&insight, &self.budget));
            insights.push(insight);
        }

        let overall_health = OverallFinancialHealth::from_insights(&insights, &self.health);
        // Nothing analyzed means nothing to summarize
        if !insights.is_empty() {
            firings.extend(cross_budget_rules(&overall_health, &self.budget));
        }

        let mut triggered_rules = Vec::with_capacity(firings.len());
        let mut recommendations = vec![];
        for firing in firings {
            triggered_rules.push(firing.rule);
            recommendations.extend(firing.recommendation);
        }

        tracing::debug!(
            analyzed = insights.len(),
            skipped = skipped.len(),
            rules = triggered_rules.len(),
            score = overall_health.score,
            "Budget analysis complete"
        );

        BudgetAnalysisResult {
            analyzed_at: now,
            insights,
            triggered_rules,
            recommendations,
            overall_health,
            skipped,
            warnings,
        }
    }
}
