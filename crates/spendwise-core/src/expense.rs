//! Expense pre-check
//!
//! Tells the caller, before an expense is recorded, which active budgets it
//! would push over their limit.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Budget, BudgetId, CategoryId, ExpenseDraft};
use crate::period::resolve_window;

/// A budget the draft expense would exceed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceedWarning {
    pub budget_id: BudgetId,
    pub budget_name: String,
    /// None for global budgets
    pub category_id: Option<CategoryId>,
    pub current_spent: f64,
    pub budget_amount: f64,
    pub new_total: f64,
    pub overshoot: f64,
}

/// Check a draft expense against every budget covering its category
///
/// `spent` holds each budget's spending in its current period. Budgets whose
/// active window does not contain `now`, or that have no usable amount, are
/// ignored.
pub fn check_expense(
    budgets: &[Budget],
    spent: &BTreeMap<BudgetId, f64>,
    draft: &ExpenseDraft,
    now: NaiveDateTime,
) -> Result<Vec<ExceedWarning>> {
    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "expense amount must be positive, got {}",
            draft.amount
        )));
    }

    let warnings: Vec<ExceedWarning> = budgets
        .iter()
        .filter(|b| b.covers_category(draft.category_id))
        .filter(|b| b.amount.is_finite() && b.amount > 0.0)
        .filter(|b| resolve_window(&b.period_spec(), now).contains(now))
        .filter_map(|b| {
            let current_spent = spent.get(&b.id).copied().unwrap_or(0.0);
            let new_total = current_spent + draft.amount;
            (new_total > b.amount).then(|| ExceedWarning {
                budget_id: b.id,
                budget_name: b.name.clone(),
                category_id: b.category_id,
                current_spent,
                budget_amount: b.amount,
                new_total,
                overshoot: new_total - b.amount,
            })
        })
        .collect();

    tracing::debug!(
        category_id = draft.category_id,
        amount = draft.amount,
        exceeded = warnings.len(),
        "Checked expense against budgets"
    );

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodType;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn draft(category_id: CategoryId, amount: f64) -> ExpenseDraft {
        ExpenseDraft {
            category_id,
            amount,
        }
    }

    #[test]
    fn test_category_and_global_budgets_checked() {
        let budgets = vec![
            Budget::new(1, "Coffee", 100.0, PeriodType::Monthly).with_category(7),
            Budget::new(2, "Everything", 1000.0, PeriodType::Monthly),
            Budget::new(3, "Books", 50.0, PeriodType::Monthly).with_category(8),
        ];
        let spent = BTreeMap::from([(1, 90.0), (2, 995.0), (3, 49.0)]);

        let warnings = check_expense(&budgets, &spent, &draft(7, 20.0), now()).unwrap();

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].budget_id, 1);
        assert_eq!(warnings[0].new_total, 110.0);
        assert_eq!(warnings[0].overshoot, 10.0);
        assert_eq!(warnings[1].budget_id, 2);
        assert_eq!(warnings[1].category_id, None);
    }

    #[test]
    fn test_exactly_reaching_limit_is_fine() {
        let budgets = vec![Budget::new(1, "Coffee", 100.0, PeriodType::Monthly).with_category(7)];
        let spent = BTreeMap::from([(1, 80.0)]);
        assert!(check_expense(&budgets, &spent, &draft(7, 20.0), now())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_inactive_custom_budget_ignored() {
        let budgets = vec![
            Budget::new(1, "Summer trip", 100.0, PeriodType::Custom)
                .with_dates("06/01/2026", "08/31/2026"),
            Budget::new(2, "Autumn", 100.0, PeriodType::Custom)
                .with_dates("10/01/2026", "10/31/2026"),
        ];
        let warnings = check_expense(&budgets, &BTreeMap::new(), &draft(1, 150.0), now()).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].budget_id, 2);
    }

    #[test]
    fn test_invalid_draft_rejected() {
        let err = check_expense(&[], &BTreeMap::new(), &draft(1, 0.0), now()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}
