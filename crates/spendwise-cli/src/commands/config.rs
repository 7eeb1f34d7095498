//! Config command implementations (show, path, init)

use std::fs;

use anyhow::{bail, Context as _, Result};
use spendwise_core::config::{default_config_path, AnalyticsConfig};

use super::{print_json, Context};

pub fn cmd_config_show(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    if ctx.json {
        return print_json(&config);
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    match default_config_path() {
        Some(path) => {
            let state = if path.exists() { "exists" } else { "not created" };
            println!("{} ({})", path.display(), state);
        }
        None => println!("No per-user data directory on this platform"),
    }
    Ok(())
}

pub fn cmd_config_init(force: bool) -> Result<()> {
    let Some(path) = default_config_path() else {
        bail!("No per-user data directory on this platform");
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = AnalyticsConfig::embedded()?.to_toml()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Wrote default thresholds to {}", path.display());
    Ok(())
}
