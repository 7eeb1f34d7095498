//! Shared command utilities
//!
//! This module contains:
//! - `Context` - Global options every command receives
//! - `parse_now` - The pinned analysis time
//! - `print_json` - JSON output for `--json`

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use spendwise_core::config::AnalyticsConfig;

use crate::store::Store;

/// Global options resolved from the command line
#[derive(Debug, Clone)]
pub struct Context {
    pub snapshot: PathBuf,
    pub transactions: PathBuf,
    pub config: Option<PathBuf>,
    pub now: Option<String>,
    pub json: bool,
}

impl Context {
    pub fn load_config(&self) -> Result<AnalyticsConfig> {
        AnalyticsConfig::load(self.config.as_deref()).context("Failed to load analytics config")
    }

    pub fn open_store(&self) -> Result<Store> {
        Store::load(&self.snapshot, &self.transactions)
    }

    /// Read the clock once per command
    pub fn now(&self) -> Result<NaiveDateTime> {
        match &self.now {
            Some(value) => parse_now(value),
            None => Ok(spendwise_core::local_now()),
        }
    }
}

/// Parse `--now`: a local date-time, or a date meaning midday
pub fn parse_now(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(12, 0, 0) {
            return Ok(dt);
        }
    }
    bail!(
        "Invalid --now value '{}': expected YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD",
        value
    )
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
