//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the engine policy
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use fairshare_core::config::default_config_path;
use fairshare_core::{db::Database, EngineConfig};
use tracing::debug;

/// Open (or create) the database and run migrations
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Explicit --config file, else the data-dir override, else built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = EngineConfig::load(path).context("Failed to load engine config")?;
    debug!(
        source = %path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "default".to_string()),
        "Loaded engine config"
    );
    Ok(config)
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    match default_config_path() {
        Some(path) if path.exists() => println!("   Config: {}", path.display()),
        Some(path) => println!("   Config: built-in (override at {})", path.display()),
        None => println!("   Config: built-in"),
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add members: fairshare members add --space home alice");
    println!("  2. Import history: fairshare import --file history.csv --space home");
    println!("  3. Get suggestions: fairshare recommend --space home --member alice");

    Ok(())
}
