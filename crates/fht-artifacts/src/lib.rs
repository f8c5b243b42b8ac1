//! Output artifacts of a pipeline run.
//!
//! ```text
//! <output_dir>/
//!   transactions_batch_0-5.csv
//!   transactions_batch_5-10.csv
//!   ...
//!   manifest.json
//! ```
//!
//! Every transactions CSV carries the same header (see [`TRANSACTION_COLUMNS`]).

mod transactions;

pub use transactions::{
    batch_file_name, combine_csv_files, format_pct, read_transactions_csv,
    write_transactions_csv, write_transactions_file, CombineResult, TransactionRecord,
    TRANSACTION_COLUMNS,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub source: String,
    pub config_hash: String,
    pub created_at_utc: DateTime<Utc>,
    pub funds_total: usize,
    pub funds_failed: Vec<String>,
    pub transactions_written: usize,
    /// File names relative to the output directory.
    pub batch_files: Vec<String>,
}

pub struct WriteManifestArgs<'a> {
    pub output_dir: &'a Path,
    pub run_id: Uuid,
    pub source: &'a str,
    pub config_hash: &'a str,
    pub funds_total: usize,
    pub funds_failed: &'a [String],
    pub transactions_written: usize,
    pub batch_files: &'a [String],
}

/// Write `<output_dir>/manifest.json`, overwriting any previous manifest.
pub fn write_run_manifest(args: WriteManifestArgs<'_>) -> Result<PathBuf> {
    fs::create_dir_all(args.output_dir)
        .with_context(|| format!("create output dir failed: {}", args.output_dir.display()))?;

    let manifest = RunManifest {
        schema_version: 1,
        run_id: args.run_id,
        source: args.source.to_string(),
        config_hash: args.config_hash.to_string(),
        created_at_utc: Utc::now(),
        funds_total: args.funds_total,
        funds_failed: args.funds_failed.to_vec(),
        transactions_written: args.transactions_written,
        batch_files: args.batch_files.to_vec(),
    };

    let manifest_path = args.output_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    Ok(manifest_path)
}

pub fn read_run_manifest(path: &Path) -> Result<RunManifest> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read manifest failed: {}", path.display()))?;
    serde_json::from_str(&s).context("parse manifest json failed")
}
