//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config)
//! - `import` - Task history CSV import
//! - `members` - Member management (add, list)
//! - `workload` - Stats, fairness scores and bulk assignment
//! - `recommend` - Ranked task recommendations
//! - `insights` - Habits, insights and insight status changes

pub mod core;
pub mod import;
pub mod insights;
pub mod members;
pub mod recommend;
pub mod workload;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use insights::*;
pub use members::*;
pub use recommend::*;
pub use workload::*;

use anyhow::{Context, Result};
use serde::Serialize;

/// How data commands print their results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
