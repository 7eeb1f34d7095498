//! Period Resolver
//!
//! Turns a budget's period description and a pinned "now" into the active
//! window and the three day counts every other component works from.
//!
//! Windows are inclusive: they start at 00:00:00.000 on the first day and end
//! at 23:59:59.999 on the last day. Day counts use whole days (partial days
//! are dropped), so `elapsed + remaining` counts today twice.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Date formats accepted for custom periods, tried in order
const CUSTOM_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// What the resolver needs to know about a budget's period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PeriodSpec {
    Daily,
    /// Monday through Sunday
    Weekly,
    Monthly,
    Yearly,
    Custom {
        start: Option<String>,
        end: Option<String>,
    },
}

/// The active window of a budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// True when a custom period could not be parsed and fell back to "now"
    pub degraded: bool,
}

/// Whole-day counts for a window as seen from a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDays {
    /// Days since the window started, today included (1..=total)
    pub elapsed: i64,
    /// Whole days left before the window ends (0..=total)
    pub remaining: i64,
    /// Length of the window in days (>= 1)
    pub total: i64,
}

impl PeriodWindow {
    /// Day counts for this window as seen from `now`
    pub fn days_at(&self, now: NaiveDateTime) -> PeriodDays {
        let total = ((self.end - self.start).num_days() + 1).max(1);
        let elapsed = ((now - self.start).num_days() + 1).clamp(1, total);
        let remaining = (self.end - now).num_days().clamp(0, total);

        PeriodDays {
            elapsed,
            remaining,
            total,
        }
    }

    /// Whether `instant` falls inside the window (bounds inclusive)
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Whether any part of `date` falls inside the window
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start.date() && date <= self.end.date()
    }
}

/// Compute the active window for `spec` at `now`
pub fn resolve_window(spec: &PeriodSpec, now: NaiveDateTime) -> PeriodWindow {
    let today = now.date();

    let (first, last) = match spec {
        PeriodSpec::Daily => (today, today),
        PeriodSpec::Weekly => {
            let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            (monday, monday + Duration::days(6))
        }
        PeriodSpec::Monthly => {
            let first = today - Duration::days(i64::from(today.day0()));
            (first, last_day_of_month(first))
        }
        PeriodSpec::Yearly => {
            let first = today - Duration::days(i64::from(today.ordinal0()));
            let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(NaiveDate::MAX);
            (first, last)
        }
        PeriodSpec::Custom { start, end } => {
            match (parse_custom_date(start.as_deref()), parse_custom_date(end.as_deref())) {
                (Some(first), Some(last)) => (first, last),
                _ => {
                    return PeriodWindow {
                        start: now,
                        end: now,
                        degraded: true,
                    }
                }
            }
        }
    };

    PeriodWindow {
        start: start_of_day(first),
        end: end_of_day(last),
        degraded: false,
    }
}

/// Resolve the window and its day counts in one step
pub fn resolve(spec: &PeriodSpec, now: NaiveDateTime) -> (PeriodWindow, PeriodDays) {
    let window = resolve_window(spec, now);
    (window, window.days_at(now))
}

/// Number of days in a calendar month, leap years included
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1).map_or(0, |first| last_day_of_month(first).day())
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn parse_custom_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    CUSTOM_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_window() {
        let now = at(2026, 10, 19, 15, 30);
        let (window, days) = resolve(&PeriodSpec::Daily, now);

        assert_eq!(window.start, at(2026, 10, 19, 0, 0));
        assert_eq!(
            window.end,
            date(2026, 10, 19).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
        assert_eq!(
            days,
            PeriodDays {
                elapsed: 1,
                remaining: 0,
                total: 1
            }
        );
    }

    #[test]
    fn test_weekly_window_starts_monday() {
        // 2026-10-19 is a Monday
        let (window, days) = resolve(&PeriodSpec::Weekly, at(2026, 10, 19, 9, 0));
        assert_eq!(window.start.date(), date(2026, 10, 19));
        assert_eq!(window.end.date(), date(2026, 10, 25));
        assert_eq!(days.total, 7);
        assert_eq!(days.elapsed, 1);
        assert_eq!(days.remaining, 6);
    }

    #[test]
    fn test_weekly_window_sunday_belongs_to_previous_monday() {
        let (window, days) = resolve(&PeriodSpec::Weekly, at(2026, 10, 25, 20, 0));
        assert_eq!(window.start.date(), date(2026, 10, 19));
        assert_eq!(window.end.date(), date(2026, 10, 25));
        assert_eq!(days.elapsed, 7);
        assert_eq!(days.remaining, 0);
    }

    #[test]
    fn test_monthly_window_handles_leap_february() {
        let (window, days) = resolve(&PeriodSpec::Monthly, at(2028, 2, 10, 12, 0));
        assert_eq!(window.start.date(), date(2028, 2, 1));
        assert_eq!(window.end.date(), date(2028, 2, 29));
        assert_eq!(days.total, 29);
        assert_eq!(days.elapsed, 10);
        assert_eq!(days.remaining, 19);

        let (window, days) = resolve(&PeriodSpec::Monthly, at(2026, 2, 10, 12, 0));
        assert_eq!(window.end.date(), date(2026, 2, 28));
        assert_eq!(days.total, 28);
    }

    #[test]
    fn test_monthly_day_twenty_of_thirty() {
        let (_, days) = resolve(&PeriodSpec::Monthly, at(2026, 9, 20, 12, 0));
        assert_eq!(days.total, 30);
        assert_eq!(days.elapsed, 20);
        assert_eq!(days.remaining, 10);
    }

    #[test]
    fn test_yearly_window() {
        let (window, days) = resolve(&PeriodSpec::Yearly, at(2026, 1, 1, 0, 0));
        assert_eq!(window.start.date(), date(2026, 1, 1));
        assert_eq!(window.end.date(), date(2026, 12, 31));
        assert_eq!(days.total, 365);
        assert_eq!(days.elapsed, 1);
        assert_eq!(days.remaining, 364);

        let (window, days) = resolve(&PeriodSpec::Yearly, at(2028, 7, 4, 9, 0));
        assert_eq!(window.start.date(), date(2028, 1, 1));
        assert_eq!(window.end.date(), date(2028, 12, 31));
        assert_eq!(days.total, 366);
    }

    #[test]
    fn test_custom_window_parses_both_formats() {
        let spec = PeriodSpec::Custom {
            start: Some("10/01/2026".to_string()),
            end: Some("2026-10-31".to_string()),
        };
        let (window, days) = resolve(&spec, at(2026, 10, 19, 8, 0));
        assert!(!window.degraded);
        assert_eq!(window.start.date(), date(2026, 10, 1));
        assert_eq!(window.end.date(), date(2026, 10, 31));
        assert_eq!(days.total, 31);
        assert_eq!(days.elapsed, 19);
        assert_eq!(days.remaining, 12);
    }

    #[test]
    fn test_custom_window_unparseable_falls_back_to_one_day() {
        let now = at(2026, 10, 19, 8, 0);
        let spec = PeriodSpec::Custom {
            start: Some("not a date".to_string()),
            end: Some("10/31/2026".to_string()),
        };
        let (window, days) = resolve(&spec, now);
        assert!(window.degraded);
        assert_eq!(window.start, now);
        assert_eq!(window.end, now);
        assert_eq!(
            days,
            PeriodDays {
                elapsed: 1,
                remaining: 0,
                total: 1
            }
        );

        let missing = PeriodSpec::Custom {
            start: None,
            end: None,
        };
        assert!(resolve_window(&missing, now).degraded);
    }

    #[test]
    fn test_custom_window_in_the_future_clamps_elapsed() {
        let spec = PeriodSpec::Custom {
            start: Some("12/01/2026".to_string()),
            end: Some("12/10/2026".to_string()),
        };
        let days = resolve_window(&spec, at(2026, 10, 19, 8, 0)).days_at(at(2026, 10, 19, 8, 0));
        assert_eq!(days.total, 10);
        assert_eq!(days.elapsed, 1);
        assert_eq!(days.remaining, 10);
    }

    #[test]
    fn test_day_counts_stay_in_bounds() {
        let specs = [
            PeriodSpec::Daily,
            PeriodSpec::Weekly,
            PeriodSpec::Monthly,
            PeriodSpec::Yearly,
        ];
        let mut now = at(2026, 1, 1, 0, 0);
        while now < at(2027, 1, 15, 0, 0) {
            for spec in &specs {
                let days = resolve_window(spec, now).days_at(now);
                assert!(days.total >= 1);
                assert!(days.elapsed >= 1 && days.elapsed <= days.total);
                assert!(days.remaining >= 0 && days.remaining <= days.total);
            }
            now += Duration::hours(37);
        }
    }

    #[test]
    fn test_window_contains() {
        let window = resolve_window(&PeriodSpec::Monthly, at(2026, 10, 19, 8, 0));
        assert!(window.contains(at(2026, 10, 1, 0, 0)));
        assert!(window.contains(at(2026, 10, 31, 23, 59)));
        assert!(!window.contains(at(2026, 11, 1, 0, 0)));
        assert!(window.contains_date(date(2026, 10, 31)));
        assert!(!window.contains_date(date(2026, 9, 30)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
        assert_eq!(days_in_month(2026, 13), 0);
    }
}
