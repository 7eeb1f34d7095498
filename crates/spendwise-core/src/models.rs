//! Domain models for Spendwise
//!
//! These are the read-only inputs handed to the analytics core by its callers.
//! Persistence of budgets and transactions lives outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::period::PeriodSpec;

/// Identifier of a budget in the external store
pub type BudgetId = i64;

/// Identifier of a category in the external category directory
pub type CategoryId = i64;

/// How a budget's active window is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Explicit start/end dates on the budget
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::InvalidPeriodType(s.to_string())),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending budget as stored by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub wallet_id: Option<i64>,
    /// Category this budget is limited to (None = global budget, all categories)
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub amount: f64,
    pub period_type: PeriodType,
    /// Start date for custom periods (MM/DD/YYYY)
    #[serde(default)]
    pub start_date: Option<String>,
    /// End date for custom periods (MM/DD/YYYY)
    #[serde(default)]
    pub end_date: Option<String>,
    /// Fraction of the budget at which the owner wants to be alerted (e.g. 0.8)
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

fn default_alert_threshold() -> f64 {
    0.8
}

impl Budget {
    /// Create a budget with no owner, no category and the default alert threshold
    pub fn new(id: BudgetId, name: impl Into<String>, amount: f64, period_type: PeriodType) -> Self {
        Self {
            id,
            name: name.into(),
            user_id: None,
            wallet_id: None,
            category_id: None,
            amount,
            period_type,
            start_date: None,
            end_date: None,
            alert_threshold: default_alert_threshold(),
        }
    }

    /// Limit the budget to a single category
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set explicit bounds (only meaningful for custom periods)
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = threshold;
        self
    }

    /// Global budgets cover every category
    pub fn is_global(&self) -> bool {
        self.category_id.is_none()
    }

    /// Whether spending in `category_id` counts against this budget
    pub fn covers_category(&self, category_id: CategoryId) -> bool {
        match self.category_id {
            Some(id) => id == category_id,
            None => true,
        }
    }

    /// The period description handed to the resolver
    pub fn period_spec(&self) -> PeriodSpec {
        match self.period_type {
            PeriodType::Daily => PeriodSpec::Daily,
            PeriodType::Weekly => PeriodSpec::Weekly,
            PeriodType::Monthly => PeriodSpec::Monthly,
            PeriodType::Yearly => PeriodSpec::Yearly,
            PeriodType::Custom => PeriodSpec::Custom {
                start: self.start_date.clone(),
                end: self.end_date.clone(),
            },
        }
    }
}

/// A spending category from the external category directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An expense the user is about to record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub category_id: CategoryId,
    pub amount: f64,
}
