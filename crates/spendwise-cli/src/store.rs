//! File-backed stand-in for the transaction store and category directory
//!
//! Budgets and categories come from a JSON snapshot:
//!
//! ```json
//! {
//!   "budgets": [{"id": 1, "name": "Food", "amount": 1000000, "period_type": "monthly", "category_id": 10}],
//!   "categories": [{"id": 10, "name": "Food"}]
//! }
//! ```
//!
//! Transactions come from a CSV with the header
//! `date,category_id,category,amount,kind,wallet_id` where `date` is
//! `YYYY-MM-DD` and `kind` is `expense` or `income`. The `wallet_id` column is
//! optional; rows without one count toward every wallet.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use spendwise_core::models::{Budget, BudgetId, Category, CategoryId};
use spendwise_core::patterns::{MonthlyAmount, YearMonth};
use spendwise_core::period::resolve_window;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

/// One row of the transactions CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: NaiveDate,
    pub category_id: CategoryId,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub wallet_id: Option<i64>,
}

impl TransactionRow {
    /// Expenses count by magnitude regardless of the sign convention of the export
    fn expense_amount(&self) -> Option<f64> {
        (self.kind == TransactionKind::Expense && self.amount.is_finite())
            .then(|| self.amount.abs())
    }

    /// Unscoped rows and unscoped filters match any wallet
    fn in_wallet(&self, wallet_id: Option<i64>) -> bool {
        match (self.wallet_id, wallet_id) {
            (Some(row), Some(wanted)) => row == wanted,
            _ => true,
        }
    }
}

/// Budgets and the category directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub budgets: Vec<Budget>,
    pub categories: Vec<Category>,
    pub transactions: Vec<TransactionRow>,
}

impl Store {
    /// Load the snapshot and, if it exists, the transactions CSV
    pub fn load(snapshot_path: &Path, transactions_path: &Path) -> Result<Self> {
        let file = File::open(snapshot_path)
            .with_context(|| format!("Failed to open snapshot {}", snapshot_path.display()))?;
        let snapshot: Snapshot = serde_json::from_reader(file)
            .with_context(|| format!("Invalid snapshot {}", snapshot_path.display()))?;

        let transactions = if transactions_path.exists() {
            let file = File::open(transactions_path).with_context(|| {
                format!("Failed to open transactions {}", transactions_path.display())
            })?;
            parse_transactions(file)
                .with_context(|| format!("Invalid transactions {}", transactions_path.display()))?
        } else {
            tracing::warn!(
                path = %transactions_path.display(),
                "Transactions file not found, assuming no spending"
            );
            vec![]
        };

        tracing::debug!(
            budgets = snapshot.budgets.len(),
            categories = snapshot.categories.len(),
            transactions = transactions.len(),
            "Loaded store"
        );

        Ok(Self {
            budgets: snapshot.budgets,
            categories: snapshot.categories,
            transactions,
        })
    }

    /// Budgets in one wallet, or all of them
    pub fn budgets_in_wallet(&self, wallet_id: Option<i64>) -> Vec<Budget> {
        self.budgets
            .iter()
            .filter(|b| wallet_id.is_none() || b.wallet_id == wallet_id)
            .cloned()
            .collect()
    }

    pub fn category_names(&self) -> BTreeMap<CategoryId, String> {
        self.categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect()
    }

    /// Directory entry for a transaction, falling back to the name on the row
    fn category_of(&self, row: &TransactionRow) -> Category {
        self.categories
            .iter()
            .find(|c| c.id == row.category_id)
            .cloned()
            .unwrap_or_else(|| {
                let name = if row.category.is_empty() {
                    format!("Category {}", row.category_id)
                } else {
                    row.category.clone()
                };
                Category::new(row.category_id, name)
            })
    }

    /// Expense total per budget over each budget's active window, within the
    /// budget's wallet
    pub fn spent_by_budget(&self, budgets: &[Budget], now: NaiveDateTime) -> BTreeMap<BudgetId, f64> {
        budgets
            .iter()
            .map(|budget| {
                let window = resolve_window(&budget.period_spec(), now);
                let spent = self
                    .transactions
                    .iter()
                    .filter(|tx| tx.in_wallet(budget.wallet_id))
                    .filter(|tx| budget.covers_category(tx.category_id))
                    .filter(|tx| window.contains_date(tx.date))
                    .filter_map(TransactionRow::expense_amount)
                    .sum();
                (budget.id, spent)
            })
            .collect()
    }

    /// Expense totals for the month of `now` and for each of the
    /// `window_months` months before it, per category, optionally within one
    /// wallet
    pub fn monthly_totals(
        &self,
        now: NaiveDateTime,
        window_months: u32,
        wallet_id: Option<i64>,
    ) -> (BTreeMap<Category, f64>, BTreeMap<Category, Vec<MonthlyAmount>>) {
        let reference = YearMonth::of(now.date());
        let oldest = reference.months_back(window_months);

        let mut current: BTreeMap<Category, f64> = BTreeMap::new();
        let mut by_month: BTreeMap<Category, BTreeMap<YearMonth, f64>> = BTreeMap::new();

        for tx in self.transactions.iter().filter(|tx| tx.in_wallet(wallet_id)) {
            let Some(amount) = tx.expense_amount() else {
                continue;
            };
            let month = YearMonth::of(tx.date);
            if month < oldest || month > reference {
                continue;
            }
            let category = self.category_of(tx);
            if month == reference {
                *current.entry(category).or_insert(0.0) += amount;
            } else {
                *by_month
                    .entry(category)
                    .or_default()
                    .entry(month)
                    .or_insert(0.0) += amount;
            }
        }

        let history = by_month
            .into_iter()
            .map(|(category, months)| {
                let amounts = months
                    .into_iter()
                    .map(|(month, amount)| MonthlyAmount::new(month, amount))
                    .collect();
                (category, amounts)
            })
            .collect();

        (current, history)
    }
}

/// Parse the transactions CSV
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<TransactionRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize::<TransactionRow>().enumerate() {
        // +2: header line and 1-based numbering
        let row = result.with_context(|| format!("Bad transaction on line {}", line + 2))?;
        rows.push(row);
    }

    tracing::debug!("Parsed {} transactions", rows.len());
    Ok(rows)
}
