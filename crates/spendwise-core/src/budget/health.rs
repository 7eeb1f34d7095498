//! Health Scorer

use super::types::{BudgetInsight, HealthStatus, OverallFinancialHealth};
use crate::config::HealthThresholds;

impl HealthStatus {
    pub fn from_score(score: u8, t: &HealthThresholds) -> Self {
        if score >= t.healthy {
            HealthStatus::Healthy
        } else if score >= t.moderate {
            HealthStatus::Moderate
        } else if score >= t.at_risk {
            HealthStatus::AtRisk
        } else {
            HealthStatus::Critical
        }
    }
}

impl OverallFinancialHealth {
    /// Aggregate every insight into a single score and status
    pub fn from_insights(insights: &[BudgetInsight], t: &HealthThresholds) -> Self {
        let total = insights.len();
        let on_track = insights.iter().filter(|i| i.status.is_on_track()).count();
        let at_risk = insights.iter().filter(|i| i.status.is_at_risk()).count();
        let exceeded = total - on_track - at_risk;

        let score = if total == 0 {
            100
        } else {
            // Shares of the total, weighted; summed before dividing to keep whole scores exact
            let raw = (on_track as f64 * 100.0
                - exceeded as f64 * t.exceeded_penalty
                - at_risk as f64 * t.at_risk_penalty)
                / total as f64;
            raw.clamp(0.0, 100.0).floor() as u8
        };

        Self {
            status: HealthStatus::from_score(score, t),
            score,
            on_track,
            at_risk,
            exceeded,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::{BudgetStatus, Trend};
    use crate::models::PeriodType;
    use crate::period::PeriodWindow;
    use chrono::NaiveDate;

    fn with_status(status: BudgetStatus) -> BudgetInsight {
        let now = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        BudgetInsight {
            budget_id: 1,
            budget_name: "Test".to_string(),
            period_type: PeriodType::Monthly,
            category_id: None,
            category_name: None,
            budget_amount: 100.0,
            spent: 0.0,
            remaining: 100.0,
            usage_pct: 0.0,
            days_elapsed: 1,
            days_remaining: 29,
            total_days: 30,
            daily_average: 0.0,
            recommended_daily_limit: 0.0,
            expected_spent_by_now: 0.0,
            velocity: 0.0,
            status,
            trend: Trend::Stable,
            alert_threshold_reached: false,
            period: PeriodWindow {
                start: now,
                end: now,
                degraded: false,
            },
            period_degraded: false,
        }
    }

    fn score(statuses: &[BudgetStatus]) -> OverallFinancialHealth {
        let insights: Vec<_> = statuses.iter().map(|s| with_status(*s)).collect();
        OverallFinancialHealth::from_insights(&insights, &HealthThresholds::default())
    }

    #[test]
    fn test_no_budgets_is_healthy() {
        let health = score(&[]);
        assert_eq!(health.score, 100);
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.total, 0);
    }

    #[test]
    fn test_counts_by_group() {
        use BudgetStatus::*;
        let health = score(&[OnTrack, Caution, Warning, Critical, Exceeded]);
        assert_eq!(health.on_track, 2);
        assert_eq!(health.at_risk, 2);
        assert_eq!(health.exceeded, 1);
        assert_eq!(health.total, 5);
        // 40 - 10 - 10
        assert_eq!(health.score, 20);
        assert_eq!(health.status, HealthStatus::Critical);
    }

    #[test]
    fn test_score_floors_and_clamps() {
        use BudgetStatus::*;
        // 2/3 * 100 - 1/3 * 25 = 58.33
        let health = score(&[OnTrack, OnTrack, Warning]);
        assert_eq!(health.score, 58);
        assert_eq!(health.status, HealthStatus::AtRisk);

        let health = score(&[Exceeded, Exceeded]);
        assert_eq!(health.score, 0);
        assert_eq!(health.status, HealthStatus::Critical);
    }

    #[test]
    fn test_status_thresholds() {
        let t = HealthThresholds::default();
        assert_eq!(HealthStatus::from_score(80, &t), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_score(79, &t), HealthStatus::Moderate);
        assert_eq!(HealthStatus::from_score(60, &t), HealthStatus::Moderate);
        assert_eq!(HealthStatus::from_score(40, &t), HealthStatus::AtRisk);
        assert_eq!(HealthStatus::from_score(39, &t), HealthStatus::Critical);
    }

    #[test]
    fn test_more_exceeded_never_raises_score() {
        use BudgetStatus::*;
        // Fixed total of 6 and one at-risk budget; trade on-track for exceeded
        let mut previous = u8::MAX;
        for exceeded in 0..=5 {
            let mut statuses = vec![Warning];
            statuses.extend(std::iter::repeat(Exceeded).take(exceeded));
            statuses.extend(std::iter::repeat(OnTrack).take(5 - exceeded));
            let health = score(&statuses);
            assert!(health.score <= previous);
            previous = health.score;
        }
    }
}
