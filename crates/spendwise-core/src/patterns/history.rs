//! Calendar months and per-category monthly history

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl YearMonth {
    /// Returns None when `month` is outside 1-12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month `n` months before this one
    pub fn months_back(&self, n: u32) -> Self {
        let index = self.index() - i64::from(n);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn previous(&self) -> Self {
        self.months_back(1)
    }

    /// Whole months from `earlier` to `self` (negative if `earlier` is later)
    pub fn months_since(&self, earlier: YearMonth) -> i64 {
        self.index() - earlier.index()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parses `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid month (expected YYYY-MM): {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in month: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month: {}", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("Month out of range: {}", s))
    }
}

/// Total spent in one category during one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAmount {
    pub month: YearMonth,
    pub amount: f64,
}

impl MonthlyAmount {
    pub fn new(month: YearMonth, amount: f64) -> Self {
        Self { month, amount }
    }
}

/// Clean up one category's raw history for analysis
///
/// Keeps only months inside the trailing window ending at `reference`
/// (inclusive), drops non-positive amounts, sums duplicate months and lets
/// `current` stand for the reference month. The result is ordered most recent
/// month first.
pub fn normalize_history(
    raw: &[MonthlyAmount],
    current: f64,
    reference: YearMonth,
    window_months: u32,
) -> Vec<MonthlyAmount> {
    let oldest = reference.months_back(window_months.saturating_sub(1));
    let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for entry in raw {
        if entry.month < oldest || entry.month >= reference {
            continue;
        }
        if !entry.amount.is_finite() || entry.amount <= 0.0 {
            continue;
        }
        *by_month.entry(entry.month).or_insert(0.0) += entry.amount;
    }

    if current.is_finite() && current > 0.0 {
        by_month.insert(reference, current);
    }

    by_month
        .into_iter()
        .rev()
        .map(|(month, amount)| MonthlyAmount::new(month, amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_months_back_crosses_year() {
        assert_eq!(ym(2026, 3).months_back(5), ym(2025, 10));
        assert_eq!(ym(2026, 1).previous(), ym(2025, 12));
        assert_eq!(ym(2026, 12).months_back(0), ym(2026, 12));
        assert_eq!(ym(2026, 3).months_since(ym(2025, 10)), 5);
    }

    #[test]
    fn test_year_month_parse_and_display() {
        assert_eq!("2026-09".parse::<YearMonth>().unwrap(), ym(2026, 9));
        assert_eq!(ym(2026, 9).to_string(), "2026-09");
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("September".parse::<YearMonth>().is_err());
        assert!(YearMonth::new(2026, 0).is_none());
    }

    #[test]
    fn test_normalize_filters_window_and_sums() {
        let raw = vec![
            MonthlyAmount::new(ym(2026, 8), 100.0),
            MonthlyAmount::new(ym(2026, 8), 50.0),
            MonthlyAmount::new(ym(2026, 4), 70.0),
            // outside the six-month window ending 2026-09
            MonthlyAmount::new(ym(2026, 3), 999.0),
            MonthlyAmount::new(ym(2026, 6), 0.0),
            // stale figure for the reference month is replaced
            MonthlyAmount::new(ym(2026, 9), 10.0),
        ];

        let history = normalize_history(&raw, 30.0, ym(2026, 9), 6);
        assert_eq!(
            history,
            vec![
                MonthlyAmount::new(ym(2026, 9), 30.0),
                MonthlyAmount::new(ym(2026, 8), 150.0),
                MonthlyAmount::new(ym(2026, 4), 70.0),
            ]
        );
    }

    #[test]
    fn test_normalize_without_current_spending() {
        let raw = vec![
            MonthlyAmount::new(ym(2026, 9), 10.0),
            MonthlyAmount::new(ym(2026, 7), 20.0),
        ];
        let history = normalize_history(&raw, 0.0, ym(2026, 9), 6);
        assert_eq!(history, vec![MonthlyAmount::new(ym(2026, 7), 20.0)]);
    }
}
