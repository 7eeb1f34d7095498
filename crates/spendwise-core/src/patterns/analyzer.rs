//! Historical Pattern Analyzer
//!
//! Looks at the trailing window of monthly category totals (current month
//! included) and detects:
//! - Regular habits: categories with spending in most months
//! - Missing purchases: regular discretionary spending absent this month
//! - Unusual spending: this month far above or below the category average
//! - Saving opportunities: high discretionary spend, or steadily rising spend

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use super::classifier::is_essential;
use super::history::{normalize_history, MonthlyAmount, YearMonth};
use super::types::{
    HabitPattern, MissingPurchase, MonthlyComparison, PatternAnalysisResult, SavingOpportunity,
    SavingReason, SmartRecommendation, SmartRecommendationType, SmartTopic, SpendingHabit,
    SpendingTrend, UnusualKind, UnusualSpending,
};
use crate::budget::Priority;
use crate::config::{AnalyticsConfig, PatternThresholds};
use crate::models::Category;
use crate::period::days_in_month;

/// One category's cleaned-up history, most recent month first
struct CategorySeries<'a> {
    category: &'a Category,
    current: f64,
    months: Vec<MonthlyAmount>,
    essential: bool,
}

impl CategorySeries<'_> {
    fn occurrences(&self) -> usize {
        self.months.len()
    }

    fn average(&self) -> f64 {
        if self.months.is_empty() {
            return 0.0;
        }
        self.months.iter().map(|m| m.amount).sum::<f64>() / self.months.len() as f64
    }

    /// Strictly increasing when read oldest to newest
    fn strictly_increasing(&self) -> bool {
        self.months.windows(2).all(|w| w[0].amount > w[1].amount)
    }
}

/// Detects spending patterns from monthly category totals
pub struct PatternAnalyzer {
    thresholds: PatternThresholds,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self {
            thresholds: PatternThresholds::default(),
        }
    }

    pub fn with_config(config: &AnalyticsConfig) -> Self {
        Self {
            thresholds: config.patterns.clone(),
        }
    }

    pub fn with_thresholds(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    /// Analyze the window ending at the month of `now`
    ///
    /// `current_month` holds this month's totals so far; `history` holds
    /// monthly totals per category. Detection ignores entries outside the
    /// window, and `current_month` takes precedence over any history entry for
    /// this month. Categories without any spending in the window are left out.
    /// The monthly comparison baselines against the `window_months` full
    /// months before this one.
    pub fn analyze(
        &self,
        current_month: &BTreeMap<Category, f64>,
        history: &BTreeMap<Category, Vec<MonthlyAmount>>,
        now: NaiveDateTime,
    ) -> PatternAnalysisResult {
        let reference = YearMonth::of(now.date());
        let series = self.build_series(current_month, history, reference);

        let habits = self.detect_habits(&series);
        let missing_purchases = self.find_missing_purchases(&series);
        let unusual_spendings = self.detect_unusual_spending(&series);
        let saving_opportunities = self.find_saving_opportunities(&series);
        let monthly_comparison = self.compare_months(&series, history, reference);

        debug!(
            categories = series.len(),
            habits = habits.len(),
            missing = missing_purchases.len(),
            unusual = unusual_spendings.len(),
            savings = saving_opportunities.len(),
            "Pattern detection complete"
        );

        let days_left = days_in_month(now.year(), now.month()).saturating_sub(now.day());
        let recommendations = self.recommend(
            &habits,
            &missing_purchases,
            &unusual_spendings,
            &saving_opportunities,
            current_month,
            days_left,
        );

        PatternAnalysisResult {
            analyzed_at: now,
            reference_month: reference,
            habits,
            missing_purchases,
            unusual_spendings,
            saving_opportunities,
            recommendations,
            monthly_comparison,
        }
    }

    fn build_series<'a>(
        &self,
        current_month: &'a BTreeMap<Category, f64>,
        history: &'a BTreeMap<Category, Vec<MonthlyAmount>>,
        reference: YearMonth,
    ) -> Vec<CategorySeries<'a>> {
        let mut categories: Vec<&Category> = history.keys().chain(current_month.keys()).collect();
        categories.sort();
        categories.dedup();

        categories
            .into_iter()
            .filter_map(|category| {
                let current = current_month
                    .get(category)
                    .copied()
                    .filter(|a| a.is_finite() && *a > 0.0)
                    .unwrap_or(0.0);
                let raw = history.get(category).map(Vec::as_slice).unwrap_or(&[]);
                let months =
                    normalize_history(raw, current, reference, self.thresholds.window_months);

                (!months.is_empty()).then(|| CategorySeries {
                    category,
                    current,
                    months,
                    essential: is_essential(&category.name),
                })
            })
            .collect()
    }

    fn frequency(&self, occurrences: usize) -> f64 {
        occurrences as f64 / f64::from(self.thresholds.window_months)
    }

    fn detect_habits(&self, series: &[CategorySeries<'_>]) -> Vec<SpendingHabit> {
        let t = &self.thresholds;

        series
            .iter()
            .filter(|s| s.occurrences() >= 2)
            .filter_map(|s| {
                let frequency = self.frequency(s.occurrences());
                if frequency < t.regular_threshold {
                    return None;
                }
                let pattern = if frequency >= t.monthly_pattern {
                    HabitPattern::Monthly
                } else if frequency >= t.frequent_pattern {
                    HabitPattern::Frequent
                } else {
                    HabitPattern::Occasional
                };

                Some(SpendingHabit {
                    category: s.category.clone(),
                    average_amount: s.average(),
                    occurrences: s.occurrences(),
                    frequency,
                    pattern,
                    essential: s.essential,
                })
            })
            .collect()
    }

    fn find_missing_purchases(&self, series: &[CategorySeries<'_>]) -> Vec<MissingPurchase> {
        let min_occurrences =
            f64::from(self.thresholds.window_months) * self.thresholds.regular_threshold;

        series
            .iter()
            .filter(|s| s.current == 0.0 && !s.essential)
            .filter(|s| s.occurrences() as f64 >= min_occurrences)
            .map(|s| MissingPurchase {
                category: s.category.clone(),
                usual_amount: s.average(),
                months_seen: s.occurrences(),
                // Non-empty: filtered on occurrences above
                last_seen: s.months[0].month,
            })
            .collect()
    }

    fn detect_unusual_spending(&self, series: &[CategorySeries<'_>]) -> Vec<UnusualSpending> {
        let t = &self.thresholds;

        series
            .iter()
            .filter(|s| s.current > 0.0 && s.occurrences() >= 2)
            .filter_map(|s| {
                let average = s.average();
                let kind = if s.current > average * t.spike_ratio {
                    UnusualKind::Spike
                } else if s.current < average * t.drop_ratio {
                    UnusualKind::Drop
                } else {
                    return None;
                };

                Some(UnusualSpending {
                    category: s.category.clone(),
                    current_amount: s.current,
                    average_amount: average,
                    pct_change: (s.current - average) / average * 100.0,
                    kind,
                })
            })
            .collect()
    }

    fn find_saving_opportunities(&self, series: &[CategorySeries<'_>]) -> Vec<SavingOpportunity> {
        let t = &self.thresholds;
        let mut opportunities = vec![];

        for s in series.iter().filter(|s| s.current > 0.0 && !s.essential) {
            if s.current > t.high_spend_floor {
                let minimum = s
                    .months
                    .iter()
                    .map(|m| m.amount)
                    .fold(s.current, f64::min);
                if s.current > minimum * t.min_reduction_ratio {
                    opportunities.push(SavingOpportunity {
                        category: s.category.clone(),
                        current_amount: s.current,
                        potential_saving: s.current - minimum,
                        reason: SavingReason::AboveMinimum { minimum },
                    });
                }
            }

            if s.occurrences() >= 3 && s.strictly_increasing() {
                if let Some(first) = s.months.last() {
                    let increase = s.current - first.amount;
                    if increase > t.rising_trend_min_increase {
                        opportunities.push(SavingOpportunity {
                            category: s.category.clone(),
                            current_amount: s.current,
                            potential_saving: increase,
                            reason: SavingReason::RisingTrend {
                                months: s.occurrences(),
                                first_amount: first.amount,
                            },
                        });
                    }
                }
            }
        }

        opportunities
    }

    fn compare_months(
        &self,
        series: &[CategorySeries<'_>],
        history: &BTreeMap<Category, Vec<MonthlyAmount>>,
        reference: YearMonth,
    ) -> MonthlyComparison {
        let t = &self.thresholds;
        let last = reference.previous();
        // Baseline: `window_months` full months before this one
        let oldest = reference.months_back(t.window_months);

        let this_month: f64 = series.iter().map(|s| s.current).sum();
        let mut last_month = 0.0;
        let mut prior_total = 0.0;
        for entry in history.values().flatten() {
            if entry.month < oldest || entry.month >= reference {
                continue;
            }
            if !entry.amount.is_finite() || entry.amount <= 0.0 {
                continue;
            }
            if entry.month == last {
                last_month += entry.amount;
            }
            prior_total += entry.amount;
        }

        let average_monthly = if t.window_months > 0 {
            prior_total / f64::from(t.window_months)
        } else {
            0.0
        };

        let pct_vs_last_month = pct_change(this_month, last_month);
        let pct_vs_average = pct_change(this_month, average_monthly);
        let trend = if pct_vs_average > t.trend_band_pct {
            SpendingTrend::Increasing
        } else if pct_vs_average < -t.trend_band_pct {
            SpendingTrend::Decreasing
        } else {
            SpendingTrend::Stable
        };

        MonthlyComparison {
            this_month,
            last_month,
            average_monthly,
            pct_vs_last_month,
            pct_vs_average,
            trend,
        }
    }

    fn recommend(
        &self,
        habits: &[SpendingHabit],
        missing: &[MissingPurchase],
        unusual: &[UnusualSpending],
        savings: &[SavingOpportunity],
        current_month: &BTreeMap<Category, f64>,
        days_left: u32,
    ) -> Vec<SmartRecommendation> {
        let t = &self.thresholds;
        let mut recs = vec![];

        for m in missing {
            recs.push(SmartRecommendation {
                kind: SmartRecommendationType::Spend,
                priority: Priority::Medium,
                topic: SmartTopic::MissingPurchase,
                category: Some(m.category.clone()),
                amount: m.usual_amount,
            });
        }

        for u in unusual.iter().filter(|u| u.kind == UnusualKind::Spike) {
            recs.push(SmartRecommendation {
                kind: SmartRecommendationType::Warning,
                priority: Priority::High,
                topic: SmartTopic::Spike {
                    pct_change: u.pct_change,
                },
                category: Some(u.category.clone()),
                amount: u.current_amount - u.average_amount,
            });
        }

        for u in unusual
            .iter()
            .filter(|u| u.kind == UnusualKind::Drop && !is_essential(&u.category.name))
        {
            recs.push(SmartRecommendation {
                kind: SmartRecommendationType::Celebrate,
                priority: Priority::Low,
                topic: SmartTopic::Drop {
                    pct_change: u.pct_change,
                },
                category: Some(u.category.clone()),
                amount: u.average_amount - u.current_amount,
            });
        }

        for o in savings {
            recs.push(SmartRecommendation {
                kind: SmartRecommendationType::Save,
                priority: Priority::Medium,
                topic: SmartTopic::Saving {
                    reason: o.reason.clone(),
                },
                category: Some(o.category.clone()),
                amount: o.potential_saving,
            });
        }

        let habits_kept = habits
            .iter()
            .filter(|h| {
                let current = current_month.get(&h.category).copied().unwrap_or(0.0);
                current <= h.average_amount * t.habit_tolerance
            })
            .count();
        if habits_kept >= t.good_habits_min {
            recs.push(SmartRecommendation {
                kind: SmartRecommendationType::Celebrate,
                priority: Priority::Low,
                topic: SmartTopic::GoodHabits { habits_kept },
                category: None,
                amount: 0.0,
            });
        }

        if days_left <= t.month_end_days {
            for m in missing {
                recs.push(SmartRecommendation {
                    kind: SmartRecommendationType::Spend,
                    priority: Priority::High,
                    topic: SmartTopic::MonthEnd { days_left },
                    category: Some(m.category.clone()),
                    amount: m.usual_amount,
                });
            }
        }

        recs
    }
}

/// Percentage change against a baseline, 0 when the baseline is 0
fn pct_change(value: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (value - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn cat(id: i64, name: &str) -> Category {
        Category::new(id, name)
    }

    /// Monthly amounts ending the month before September 2026, oldest first
    fn months_before_sept(amounts: &[f64]) -> Vec<MonthlyAmount> {
        let n = amounts.len() as u32;
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| MonthlyAmount::new(ym(2026, 9).months_back(n - i as u32), *a))
            .collect()
    }

    #[test]
    fn test_coffee_missing_purchase() {
        let coffee = cat(1, "Coffee");
        let history = BTreeMap::from([(coffee.clone(), months_before_sept(&[200_000.0; 5]))]);
        let current = BTreeMap::new();

        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));

        assert_eq!(result.missing_purchases.len(), 1);
        let missing = &result.missing_purchases[0];
        assert_eq!(missing.category, coffee);
        assert_eq!(missing.usual_amount, 200_000.0);
        assert_eq!(missing.months_seen, 5);
        assert_eq!(missing.last_seen, ym(2026, 8));

        assert_eq!(result.habits.len(), 1);
        assert_eq!(result.habits[0].pattern, HabitPattern::Monthly);

        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].kind, SmartRecommendationType::Spend);
        assert_eq!(result.recommendations[0].priority, Priority::Medium);
    }

    #[test]
    fn test_essential_category_never_missing() {
        let history = BTreeMap::from([(cat(1, "Groceries"), months_before_sept(&[300.0; 5]))]);
        let result = PatternAnalyzer::new().analyze(&BTreeMap::new(), &history, at(2026, 9, 10));
        assert!(result.missing_purchases.is_empty());
        assert!(result.habits[0].essential);
    }

    #[test]
    fn test_three_months_is_not_a_habit() {
        // 3 of 6 = 0.5, below 0.6
        let history = BTreeMap::from([(cat(1, "Books"), months_before_sept(&[50.0; 3]))]);
        let result = PatternAnalyzer::new().analyze(&BTreeMap::new(), &history, at(2026, 9, 10));
        assert!(result.habits.is_empty());
        assert!(result.missing_purchases.is_empty());
    }

    #[test]
    fn test_rising_trend_saving() {
        let gadgets = cat(3, "Gadgets");
        let history = BTreeMap::from([(
            gadgets.clone(),
            months_before_sept(&[100_000.0, 150_000.0, 200_000.0, 250_000.0]),
        )]);
        let current = BTreeMap::from([(gadgets.clone(), 300_000.0)]);

        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));

        assert_eq!(result.saving_opportunities.len(), 1);
        let opp = &result.saving_opportunities[0];
        assert_eq!(opp.potential_saving, 200_000.0);
        assert_eq!(
            opp.reason,
            SavingReason::RisingTrend {
                months: 5,
                first_amount: 100_000.0
            }
        );
    }

    #[test]
    fn test_rising_trend_needs_strict_increase() {
        let gadgets = cat(3, "Gadgets");
        let history = BTreeMap::from([(
            gadgets.clone(),
            months_before_sept(&[100_000.0, 150_000.0, 150_000.0, 250_000.0]),
        )]);
        let current = BTreeMap::from([(gadgets, 300_000.0)]);

        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));
        assert!(result.saving_opportunities.is_empty());
    }

    #[test]
    fn test_high_spend_above_minimum() {
        let shopping = cat(4, "Shopping");
        let history = BTreeMap::from([(
            shopping.clone(),
            months_before_sept(&[400_000.0, 700_000.0, 450_000.0]),
        )]);
        let current = BTreeMap::from([(shopping, 800_000.0)]);

        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));

        let opp = &result.saving_opportunities[0];
        assert_eq!(opp.potential_saving, 400_000.0);
        assert_eq!(opp.reason, SavingReason::AboveMinimum { minimum: 400_000.0 });
    }

    #[test]
    fn test_spike_and_drop() {
        let dining = cat(5, "Dining");
        let hobby = cat(6, "Hobbies");
        let history = BTreeMap::from([
            (dining.clone(), months_before_sept(&[100.0, 100.0])),
            (hobby.clone(), months_before_sept(&[1000.0, 1000.0, 1000.0])),
        ]);
        let current = BTreeMap::from([(dining.clone(), 400.0), (hobby.clone(), 100.0)]);

        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));

        // Average includes the current month: dining (100+100+400)/3 = 200
        let spike = &result.unusual_spendings[0];
        assert_eq!(spike.category, dining);
        assert_eq!(spike.kind, UnusualKind::Spike);
        assert_eq!(spike.average_amount, 200.0);
        assert_eq!(spike.pct_change, 100.0);

        // hobby (3000+100)/4 = 775
        let drop = &result.unusual_spendings[1];
        assert_eq!(drop.category, hobby);
        assert_eq!(drop.kind, UnusualKind::Drop);

        let kinds: Vec<SmartRecommendationType> =
            result.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SmartRecommendationType::Warning,
                SmartRecommendationType::Celebrate
            ]
        );
        assert_eq!(result.recommendations[0].amount, 200.0);
        assert_eq!(result.recommendations[1].amount, 675.0);
    }

    #[test]
    fn test_good_habits_and_month_end_reminder() {
        let history = BTreeMap::from([
            (cat(1, "Coffee"), months_before_sept(&[100.0; 5])),
            (cat(2, "Streaming"), months_before_sept(&[10.0; 5])),
            (cat(3, "Gym"), months_before_sept(&[30.0; 5])),
        ]);
        let current = BTreeMap::from([(cat(2, "Streaming"), 10.0), (cat(3, "Gym"), 30.0)]);

        // September has 30 days; the 27th leaves 3
        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 27));

        let topics: Vec<&SmartTopic> = result.recommendations.iter().map(|r| &r.topic).collect();
        assert_eq!(
            topics,
            vec![
                &SmartTopic::MissingPurchase,
                &SmartTopic::GoodHabits { habits_kept: 3 },
                &SmartTopic::MonthEnd { days_left: 3 },
            ]
        );
        assert_eq!(result.recommendations[2].priority, Priority::High);

        // Mid-month there is no reminder
        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));
        assert!(!result
            .recommendations
            .iter()
            .any(|r| matches!(r.topic, SmartTopic::MonthEnd { .. })));
    }

    #[test]
    fn test_monthly_comparison() {
        let history = BTreeMap::from([
            // February falls outside the six months before September
            (
                cat(1, "Coffee"),
                months_before_sept(&[900.0, 140.0, 100.0, 100.0, 100.0, 100.0, 200.0]),
            ),
            (cat(2, "Books"), months_before_sept(&[0.0, 0.0, 0.0, 0.0, 100.0])),
        ]);
        let current = BTreeMap::from([(cat(1, "Coffee"), 150.0)]);

        let result = PatternAnalyzer::new().analyze(&current, &history, at(2026, 9, 10));
        let cmp = &result.monthly_comparison;

        assert_eq!(cmp.this_month, 150.0);
        assert_eq!(cmp.last_month, 300.0);
        // (140 + 400 + 300) / 6
        assert_eq!(cmp.average_monthly, 140.0);
        assert_eq!(cmp.pct_vs_last_month, -50.0);
        assert_eq!(cmp.trend, SpendingTrend::Stable);
    }

    #[test]
    fn test_no_history_no_findings() {
        let result =
            PatternAnalyzer::new().analyze(&BTreeMap::new(), &BTreeMap::new(), at(2026, 9, 10));
        assert!(result.habits.is_empty());
        assert!(result.recommendations.is_empty());
        assert_eq!(result.monthly_comparison.pct_vs_average, 0.0);
        assert_eq!(result.monthly_comparison.trend, SpendingTrend::Stable);
        assert_eq!(result.total_potential_saving(), 0.0);
    }

    #[test]
    fn test_history_outside_window_ignored() {
        let old = vec![
            MonthlyAmount::new(ym(2025, 1), 100.0),
            MonthlyAmount::new(ym(2025, 2), 100.0),
            MonthlyAmount::new(ym(2025, 3), 100.0),
            MonthlyAmount::new(ym(2025, 4), 100.0),
        ];
        let history = BTreeMap::from([(cat(1, "Coffee"), old)]);
        let result = PatternAnalyzer::new().analyze(&BTreeMap::new(), &history, at(2026, 9, 10));
        assert!(result.habits.is_empty());
        assert!(result.missing_purchases.is_empty());
    }
}
