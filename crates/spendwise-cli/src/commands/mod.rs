//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `alerts` - Alert delivery with a ledger of what was already shown
//! - `budgets` - Budget analysis report and quick response
//! - `check` - Expense pre-check against active budgets
//! - `config` - Threshold config (show, path, init)
//! - `patterns` - Spending pattern report
//! - `shared` - Global options and helpers shared by every command

pub mod alerts;
pub mod budgets;
pub mod check;
pub mod config;
pub mod patterns;
pub mod shared;

// Re-export command functions for main.rs
pub use alerts::cmd_alerts;
pub use budgets::cmd_budgets;
pub use check::cmd_check;
pub use config::*;
pub use patterns::cmd_patterns;
pub use shared::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
