//! Command handler modules for the `fht` binary.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod combine;
pub mod diff;
pub mod run;
pub mod summarize;

use anyhow::{Context, Result};
use fht_config::{load_layered_yaml, report_unused_keys, LoadedConfig, UnusedKeyPolicy};
use fht_holdings::RawHolding;
use fht_ingest::parse_holdings_csv_file;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config; no paths means built-in defaults.
pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    if paths.is_empty() {
        return LoadedConfig::empty();
    }
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    load_layered_yaml(&path_refs)
}

/// Warn about config keys nothing reads. Typos in layered YAML otherwise
/// fall back to defaults silently.
pub fn warn_unused_keys(loaded: &LoadedConfig) -> Result<()> {
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for key in &report.unused_leaf_pointers {
        warn!(key = %key, "config key is not used");
    }
    Ok(())
}

pub fn read_holdings(path: &str) -> Result<Vec<RawHolding>> {
    parse_holdings_csv_file(Path::new(path))
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("read holdings csv failed: {}", path))
}
