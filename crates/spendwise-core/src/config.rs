//! Analytics threshold configuration
//!
//! Every threshold the analyzers use lives here. The defaults ship inside the
//! binary (`config/analytics.toml`); an override file may replace any subset
//! of keys. Thresholds are operator-edited constants, never learned.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Complete analytics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub budget: BudgetThresholds,
    pub health: HealthThresholds,
    pub patterns: PatternThresholds,
}

/// Thresholds for budget status, trend and the rule chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetThresholds {
    pub velocity_critical: f64,
    pub velocity_warning: f64,
    /// Velocity at or below which spending is improving
    pub velocity_good: f64,
    pub usage_exceeded: f64,
    pub usage_critical: f64,
    pub usage_warning: f64,
    pub usage_caution: f64,
    /// "Period ending" fires when 0 < days remaining <= this
    pub period_ending_days: i64,
    /// At-risk + exceeded budgets needed for the cross-budget warning
    pub multiple_at_risk_count: usize,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            velocity_critical: 1.5,
            velocity_warning: 1.2,
            velocity_good: 0.8,
            usage_exceeded: 100.0,
            usage_critical: 90.0,
            usage_warning: 75.0,
            usage_caution: 50.0,
            period_ending_days: 2,
            multiple_at_risk_count: 2,
        }
    }
}

/// Health score boundaries and penalties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub healthy: u8,
    pub moderate: u8,
    pub at_risk: u8,
    pub exceeded_penalty: f64,
    pub at_risk_penalty: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            healthy: 80,
            moderate: 60,
            at_risk: 40,
            exceeded_penalty: 50.0,
            at_risk_penalty: 25.0,
        }
    }
}

/// Thresholds for the historical pattern analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternThresholds {
    /// Trailing months analyzed, current month included
    pub window_months: u32,
    /// Minimum frequency for a category to count as a regular habit
    pub regular_threshold: f64,
    pub monthly_pattern: f64,
    pub frequent_pattern: f64,
    pub spike_ratio: f64,
    pub drop_ratio: f64,
    /// Current-month spend above which a non-essential category may be cut back
    pub high_spend_floor: f64,
    pub min_reduction_ratio: f64,
    pub rising_trend_min_increase: f64,
    pub habit_tolerance: f64,
    pub good_habits_min: usize,
    pub month_end_days: u32,
    pub trend_band_pct: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            window_months: 6,
            regular_threshold: 0.6,
            monthly_pattern: 0.8,
            frequent_pattern: 0.5,
            spike_ratio: 1.5,
            drop_ratio: 0.5,
            high_spend_floor: 500_000.0,
            min_reduction_ratio: 1.3,
            rising_trend_min_increase: 100_000.0,
            habit_tolerance: 1.1,
            good_habits_min: 3,
            month_end_days: 5,
            trend_band_pct: 10.0,
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration: explicit path, then the platform override, then the
    /// embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(override_path) => {
                    tracing::debug!(path = %override_path.display(), "Using config override");
                    fs::read_to_string(&override_path)?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// The compiled-in defaults
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parse TOML content; missing keys keep their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML (used by `spendwise config`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject thresholds that would make the classification incoherent
    pub fn validate(&self) -> Result<()> {
        let b = &self.budget;
        if !(b.velocity_good < b.velocity_warning && b.velocity_warning <= b.velocity_critical) {
            return Err(Error::Config(format!(
                "budget velocities must satisfy good < warning <= critical (got {} / {} / {})",
                b.velocity_good, b.velocity_warning, b.velocity_critical
            )));
        }
        if !(b.usage_caution <= b.usage_warning
            && b.usage_warning <= b.usage_critical
            && b.usage_critical <= b.usage_exceeded)
        {
            return Err(Error::Config(format!(
                "budget usage levels must be ascending (got {} / {} / {} / {})",
                b.usage_caution, b.usage_warning, b.usage_critical, b.usage_exceeded
            )));
        }
        if b.period_ending_days < 0 {
            return Err(Error::Config("period_ending_days must not be negative".into()));
        }

        let h = &self.health;
        if !(h.at_risk <= h.moderate && h.moderate <= h.healthy && h.healthy <= 100) {
            return Err(Error::Config(format!(
                "health levels must satisfy at_risk <= moderate <= healthy <= 100 (got {} / {} / {})",
                h.at_risk, h.moderate, h.healthy
            )));
        }

        let p = &self.patterns;
        if p.window_months == 0 {
            return Err(Error::Config("patterns.window_months must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&p.regular_threshold) {
            return Err(Error::Config(format!(
                "patterns.regular_threshold must be within 0..=1 (got {})",
                p.regular_threshold
            )));
        }
        if p.drop_ratio >= p.spike_ratio {
            return Err(Error::Config(format!(
                "patterns.drop_ratio ({}) must be below spike_ratio ({})",
                p.drop_ratio, p.spike_ratio
            )));
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("config").join("analytics.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = AnalyticsConfig::embedded().unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AnalyticsConfig::parse(
            r#"
            [budget]
            usage_warning = 70.0

            [patterns]
            window_months = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.budget.usage_warning, 70.0);
        assert_eq!(config.budget.usage_critical, 90.0);
        assert_eq!(config.patterns.window_months, 12);
        assert_eq!(config.health, HealthThresholds::default());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = AnalyticsConfig::parse("[budget\nvelocity = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_inconsistent_thresholds_rejected() {
        let mut config = AnalyticsConfig::default();
        config.budget.velocity_warning = 2.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.budget.usage_warning = 95.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.patterns.window_months = 0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.health.moderate = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[health]\nhealthy = 85").unwrap();

        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.health.healthy, 85);
        assert_eq!(config.health.moderate, 60);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = AnalyticsConfig::load(Some(Path::new("/nonexistent/analytics.toml")));
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AnalyticsConfig::default();
        let rendered = config.to_toml().unwrap();
        assert_eq!(AnalyticsConfig::parse(&rendered).unwrap(), config);
    }
}
