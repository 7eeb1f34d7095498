//! Rule & Recommendation Engine rules
//!
//! Per-budget rules form an ordered chain. Exclusive rules are tried top-down
//! and only the first match fires; non-exclusive rules (period ending) are
//! checked for every budget regardless. Cross-budget rules run once over the
//! aggregate health after every budget has been evaluated.

use super::types::{
    ActionRecommendation, BudgetInsight, BudgetRef, BudgetStatus, HealthStatus,
    OverallFinancialHealth, Priority, RecommendationType, RuleFacts, RuleId, Severity,
    TriggeredRule,
};
use crate::config::BudgetThresholds;

/// A single per-budget rule
pub trait BudgetRule: Send + Sync {
    fn id(&self) -> RuleId;

    fn severity(&self) -> Severity;

    /// Exclusive rules compete for the single first-match slot of the chain
    fn exclusive(&self) -> bool {
        true
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool;

    /// Recommendation to emit alongside the rule, if any
    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation>;
}

/// Output of one rule firing
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFiring {
    pub rule: TriggeredRule,
    pub recommendation: Option<ActionRecommendation>,
}

/// Ordered collection of per-budget rules
pub struct RuleChain {
    rules: Vec<Box<dyn BudgetRule>>,
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleChain {
    /// Chain with the built-in rules, highest priority first
    pub fn new() -> Self {
        let mut chain = Self::empty();

        chain.register(Box::new(BudgetExceededRule));
        chain.register(Box::new(VelocityCriticalRule));
        chain.register(Box::new(UsageCriticalRule));
        chain.register(Box::new(ApproachingLimitRule));
        chain.register(Box::new(VelocityWarningRule));
        chain.register(Box::new(OnTrackRule));
        chain.register(Box::new(PeriodEndingRule));

        chain
    }

    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule; exclusive rules registered earlier take precedence
    pub fn register(&mut self, rule: Box<dyn BudgetRule>) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Evaluate the chain against one insight
    ///
    /// Returns the first matching exclusive rule followed by every matching
    /// non-exclusive rule, in registration order.
    pub fn evaluate(
        &self,
        insight: &BudgetInsight,
        thresholds: &BudgetThresholds,
    ) -> Vec<RuleFiring> {
        let exclusive = self
            .rules
            .iter()
            .filter(|r| r.exclusive())
            .find(|r| r.matches(insight, thresholds));

        let independent = self
            .rules
            .iter()
            .filter(|r| !r.exclusive())
            .filter(|r| r.matches(insight, thresholds));

        exclusive
            .into_iter()
            .chain(independent)
            .map(|rule| fire(rule.as_ref(), insight))
            .collect()
    }
}

fn fire(rule: &dyn BudgetRule, insight: &BudgetInsight) -> RuleFiring {
    let id = rule.id();
    tracing::debug!(
        budget_id = insight.budget_id,
        rule = id.as_str(),
        "Rule triggered"
    );

    RuleFiring {
        rule: TriggeredRule {
            rule: id,
            label: id.label().to_string(),
            severity: rule.severity(),
            budget: insight.budget_ref(),
            facts: RuleFacts::Budget {
                budget_amount: insight.budget_amount,
                spent: insight.spent,
                remaining: insight.remaining,
                usage_pct: insight.usage_pct,
                velocity: insight.velocity,
                days_remaining: insight.days_remaining,
            },
        },
        recommendation: rule.recommend(insight),
    }
}

fn recommendation(
    insight: &BudgetInsight,
    rule: RuleId,
    kind: RecommendationType,
    priority: Priority,
    amount: f64,
    days: Option<i64>,
) -> ActionRecommendation {
    ActionRecommendation {
        kind,
        priority,
        rule,
        amount,
        budget: insight.budget_ref(),
        days,
    }
}

/// Days until the budget runs out at the current daily average, within the period
pub fn days_until_exceeded(insight: &BudgetInsight) -> i64 {
    if insight.daily_average <= 0.0 {
        return insight.days_remaining;
    }
    let days = (insight.remaining / insight.daily_average) as i64;
    days.clamp(0, insight.days_remaining.max(0))
}

/// Spent at or above the budget amount
pub struct BudgetExceededRule;

impl BudgetRule for BudgetExceededRule {
    fn id(&self) -> RuleId {
        RuleId::BudgetExceeded
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn matches(&self, insight: &BudgetInsight, _thresholds: &BudgetThresholds) -> bool {
        insight.status == BudgetStatus::Exceeded
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        Some(recommendation(
            insight,
            self.id(),
            RecommendationType::ReduceSpending,
            Priority::High,
            insight.remaining.abs(),
            None,
        ))
    }
}

/// Spending pace far ahead of plan with days still left
pub struct VelocityCriticalRule;

impl BudgetRule for VelocityCriticalRule {
    fn id(&self) -> RuleId {
        RuleId::VelocityCritical
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool {
        insight.velocity >= thresholds.velocity_critical && insight.days_remaining > 0
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        Some(recommendation(
            insight,
            self.id(),
            RecommendationType::ReduceSpending,
            Priority::High,
            insight.recommended_daily_limit,
            Some(days_until_exceeded(insight)),
        ))
    }
}

/// Most of the budget is gone
pub struct UsageCriticalRule;

impl BudgetRule for UsageCriticalRule {
    fn id(&self) -> RuleId {
        RuleId::UsageCritical
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool {
        insight.usage_pct >= thresholds.usage_critical
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        Some(recommendation(
            insight,
            self.id(),
            RecommendationType::ReduceSpending,
            Priority::High,
            insight.recommended_daily_limit,
            Some(insight.days_remaining),
        ))
    }
}

pub struct ApproachingLimitRule;

impl BudgetRule for ApproachingLimitRule {
    fn id(&self) -> RuleId {
        RuleId::ApproachingLimit
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool {
        insight.usage_pct >= thresholds.usage_warning
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        Some(recommendation(
            insight,
            self.id(),
            RecommendationType::ReduceSpending,
            Priority::Medium,
            insight.recommended_daily_limit,
            Some(insight.days_remaining),
        ))
    }
}

pub struct VelocityWarningRule;

impl BudgetRule for VelocityWarningRule {
    fn id(&self) -> RuleId {
        RuleId::VelocityWarning
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool {
        insight.velocity >= thresholds.velocity_warning
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        Some(recommendation(
            insight,
            self.id(),
            RecommendationType::ReduceSpending,
            Priority::Medium,
            insight.recommended_daily_limit,
            Some(insight.days_remaining),
        ))
    }
}

/// Comfortably under plan; celebrates the surplus when there is one
pub struct OnTrackRule;

impl BudgetRule for OnTrackRule {
    fn id(&self) -> RuleId {
        RuleId::OnTrack
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool {
        insight.status == BudgetStatus::OnTrack && insight.velocity <= thresholds.velocity_good
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        let surplus = insight.expected_spent_by_now - insight.spent;
        (surplus > 0.0).then(|| {
            recommendation(
                insight,
                self.id(),
                RecommendationType::Celebrate,
                Priority::Low,
                surplus,
                None,
            )
        })
    }
}

/// Last days of the period with money left to spread out
pub struct PeriodEndingRule;

impl BudgetRule for PeriodEndingRule {
    fn id(&self) -> RuleId {
        RuleId::PeriodEnding
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn exclusive(&self) -> bool {
        false
    }

    fn matches(&self, insight: &BudgetInsight, thresholds: &BudgetThresholds) -> bool {
        insight.days_remaining > 0
            && insight.days_remaining <= thresholds.period_ending_days
            && insight.remaining > 0.0
    }

    fn recommend(&self, insight: &BudgetInsight) -> Option<ActionRecommendation> {
        Some(recommendation(
            insight,
            self.id(),
            RecommendationType::Redistribute,
            Priority::Low,
            insight.remaining / insight.days_remaining as f64,
            Some(insight.days_remaining),
        ))
    }
}

/// Rules evaluated once over the whole analysis scope
pub fn cross_budget_rules(
    health: &OverallFinancialHealth,
    thresholds: &BudgetThresholds,
) -> Vec<RuleFiring> {
    let facts = RuleFacts::Overall {
        at_risk: health.at_risk,
        exceeded: health.exceeded,
        total: health.total,
        score: health.score,
    };
    let mut firings = vec![];

    if health.at_risk + health.exceeded >= thresholds.multiple_at_risk_count {
        firings.push(RuleFiring {
            rule: TriggeredRule {
                rule: RuleId::MultipleBudgetsAtRisk,
                label: RuleId::MultipleBudgetsAtRisk.label().to_string(),
                severity: Severity::Critical,
                budget: BudgetRef::Overall,
                facts: facts.clone(),
            },
            recommendation: Some(ActionRecommendation {
                kind: RecommendationType::ReduceSpending,
                priority: Priority::High,
                rule: RuleId::MultipleBudgetsAtRisk,
                amount: 0.0,
                budget: BudgetRef::Overall,
                days: None,
            }),
        });
    }

    if health.status == HealthStatus::Healthy && health.exceeded == 0 {
        firings.push(RuleFiring {
            rule: TriggeredRule {
                rule: RuleId::FinancesHealthy,
                label: RuleId::FinancesHealthy.label().to_string(),
                severity: Severity::Info,
                budget: BudgetRef::Overall,
                facts,
            },
            recommendation: None,
        });
    }

    firings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::insight::calculate_insight;
    use crate::models::{Budget, PeriodType};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn insight(amount: f64, spent: f64, now: NaiveDateTime) -> BudgetInsight {
        let budget = Budget::new(1, "Food", amount, PeriodType::Monthly);
        calculate_insight(&budget, spent, None, now, &BudgetThresholds::default()).unwrap()
    }

    fn fired(insight: &BudgetInsight) -> Vec<RuleId> {
        RuleChain::new()
            .evaluate(insight, &BudgetThresholds::default())
            .into_iter()
            .map(|f| f.rule.rule)
            .collect()
    }

    #[test]
    fn test_exceeded_rule_sized_to_overshoot() {
        let i = insight(1000.0, 1200.0, at(2026, 9, 10));
        let firings = RuleChain::new().evaluate(&i, &BudgetThresholds::default());

        assert_eq!(firings.len(), 1);
        assert_eq!(firings[0].rule.rule, RuleId::BudgetExceeded);
        assert_eq!(firings[0].rule.severity, Severity::Critical);
        let rec = firings[0].recommendation.as_ref().unwrap();
        assert_eq!(rec.kind, RecommendationType::ReduceSpending);
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.amount, 200.0);
    }

    #[test]
    fn test_velocity_critical_estimates_days_until_exceeded() {
        // Day 10 of 30, spent 600 of 1000: velocity 1.8, daily average 60
        let i = insight(1000.0, 600.0, at(2026, 9, 10));
        let firings = RuleChain::new().evaluate(&i, &BudgetThresholds::default());

        assert_eq!(firings[0].rule.rule, RuleId::VelocityCritical);
        let rec = firings[0].recommendation.as_ref().unwrap();
        // 400 remaining / 60 per day = 6 days
        assert_eq!(rec.days, Some(6));
        assert_eq!(rec.amount, i.recommended_daily_limit);
    }

    #[test]
    fn test_usage_critical_when_velocity_not_critical() {
        // Day 28 of 30, 92% used: velocity < 1.5 so usage branch fires
        let i = insight(1000.0, 920.0, at(2026, 9, 28));
        assert_eq!(fired(&i), vec![RuleId::UsageCritical, RuleId::PeriodEnding]);
    }

    #[test]
    fn test_approaching_limit_and_velocity_warning() {
        // Day 25 of 30, 80% used, velocity 0.96
        let i = insight(1000.0, 800.0, at(2026, 9, 25));
        assert_eq!(fired(&i), vec![RuleId::ApproachingLimit]);

        // Day 10 of 30, 42% used, velocity 1.26
        let i = insight(1000.0, 420.0, at(2026, 9, 10));
        assert_eq!(fired(&i), vec![RuleId::VelocityWarning]);
    }

    #[test]
    fn test_on_track_celebrates_surplus() {
        // Day 15 of 30, spent 100: expected 500, surplus 400
        let i = insight(1000.0, 100.0, at(2026, 9, 15));
        let firings = RuleChain::new().evaluate(&i, &BudgetThresholds::default());

        assert_eq!(firings.len(), 1);
        assert_eq!(firings[0].rule.rule, RuleId::OnTrack);
        let rec = firings[0].recommendation.as_ref().unwrap();
        assert_eq!(rec.kind, RecommendationType::Celebrate);
        assert!((rec.amount - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_stable_pace_fires_nothing() {
        // Day 15 of 30, spent 450: velocity 0.9, on track, neither branch matches
        let i = insight(1000.0, 450.0, at(2026, 9, 15));
        assert!(fired(&i).is_empty());
    }

    #[test]
    fn test_period_ending_co_fires() {
        // Day 29 of 30, 10% used
        let i = insight(1000.0, 100.0, at(2026, 9, 29));
        let firings = RuleChain::new().evaluate(&i, &BudgetThresholds::default());
        let ids: Vec<RuleId> = firings.iter().map(|f| f.rule.rule).collect();
        assert_eq!(ids, vec![RuleId::OnTrack, RuleId::PeriodEnding]);

        let rec = firings[1].recommendation.as_ref().unwrap();
        assert_eq!(rec.kind, RecommendationType::Redistribute);
        assert_eq!(rec.days, Some(1));
        assert!((rec.amount - 900.0).abs() < 1e-6);
    }

    #[test]
    fn test_period_ending_skipped_when_exceeded() {
        let i = insight(1000.0, 1500.0, at(2026, 9, 29));
        assert_eq!(fired(&i), vec![RuleId::BudgetExceeded]);
    }

    #[test]
    fn test_days_until_exceeded_without_spending() {
        let i = insight(1000.0, 0.0, at(2026, 9, 10));
        assert_eq!(days_until_exceeded(&i), i.days_remaining);
    }

    #[test]
    fn test_cross_budget_rules() {
        let t = BudgetThresholds::default();
        let at_risk = OverallFinancialHealth {
            status: HealthStatus::Critical,
            score: 12,
            on_track: 1,
            at_risk: 1,
            exceeded: 1,
            total: 3,
        };
        let firings = cross_budget_rules(&at_risk, &t);
        assert_eq!(firings.len(), 1);
        assert_eq!(firings[0].rule.rule, RuleId::MultipleBudgetsAtRisk);
        let rec = firings[0].recommendation.as_ref().unwrap();
        assert_eq!(rec.budget, BudgetRef::Overall);
        assert_eq!(rec.amount, 0.0);
        assert_eq!(rec.priority, Priority::High);

        let healthy = OverallFinancialHealth {
            status: HealthStatus::Healthy,
            score: 100,
            on_track: 2,
            at_risk: 0,
            exceeded: 0,
            total: 2,
        };
        let firings = cross_budget_rules(&healthy, &t);
        assert_eq!(firings.len(), 1);
        assert_eq!(firings[0].rule.rule, RuleId::FinancesHealthy);
        assert!(firings[0].recommendation.is_none());
    }

    #[test]
    fn test_custom_chain_registration_order() {
        let mut chain = RuleChain::empty();
        chain.register(Box::new(OnTrackRule));
        chain.register(Box::new(BudgetExceededRule));
        assert_eq!(chain.rule_ids(), vec![RuleId::OnTrack, RuleId::BudgetExceeded]);
    }
}
