//! Error types for Spendwise

use thiserror::Error;

use crate::models::BudgetId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid budget amount for budget {budget_id}: {amount}")]
    InvalidBudgetAmount { budget_id: BudgetId, amount: f64 },

    #[error("Invalid period type: {0}")]
    InvalidPeriodType(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
