//! Typed view of the pipeline section of the merged config.
//!
//! Every key is optional; missing keys fall back to the defaults below.
//! Present keys with the wrong type or an unknown enum value are errors.

use anyhow::{anyhow, Result};
use serde_json::Value;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_CLASS_FILTER: &str = "COM";
pub const DEFAULT_OUTPUT_DIR: &str = "data/transactions";
pub const DEFAULT_COMBINED_FILE: &str = "combined_output_transactions.csv";

/// How a fund's filings are ordered before diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilingOrder {
    /// Source already lists filings oldest first.
    OldestFirst,
    /// Source lists newest first (filing index pages do); reversed before use.
    NewestFirst,
    /// Sort ascending by parsed filing date.
    ByFilingDate,
}

impl FilingOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingOrder::OldestFirst => "oldest_first",
            FilingOrder::NewestFirst => "newest_first",
            FilingOrder::ByFilingDate => "by_filing_date",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oldest_first" => Ok(FilingOrder::OldestFirst),
            "newest_first" => Ok(FilingOrder::NewestFirst),
            "by_filing_date" => Ok(FilingOrder::ByFilingDate),
            other => Err(anyhow!(
                "invalid filing_order '{}'. expected one of: oldest_first | newest_first | by_filing_date",
                other
            )),
        }
    }
}

/// What a filing with no (filtered) holdings means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFilingPolicy {
    /// Report nothing and diff the next filing against an empty baseline,
    /// so every position it holds is a new BUY.
    Reset,
    /// Report nothing and keep diffing the next filing against the last
    /// non-empty one. An empty filing usually means the table was not found.
    Skip,
    /// Treat the filing as a full exit: every prior position is sold.
    Liquidate,
}

impl EmptyFilingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmptyFilingPolicy::Reset => "reset",
            EmptyFilingPolicy::Skip => "skip",
            EmptyFilingPolicy::Liquidate => "liquidate",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(EmptyFilingPolicy::Reset),
            "skip" => Ok(EmptyFilingPolicy::Skip),
            "liquidate" => Ok(EmptyFilingPolicy::Liquidate),
            other => Err(anyhow!(
                "invalid empty_filing_policy '{}'. expected one of: reset | skip | liquidate",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Funds processed together and written to one batch file.
    pub batch_size: usize,
    pub filing_order: FilingOrder,
    pub empty_filing_policy: EmptyFilingPolicy,
    /// Substring the instrument class must contain (case-insensitive).
    pub class_filter: String,
    /// Option types whose rows are dropped (case-insensitive).
    pub skip_option_types: Vec<String>,
    pub output_dir: String,
    pub combined_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            filing_order: FilingOrder::ByFilingDate,
            empty_filing_policy: EmptyFilingPolicy::Reset,
            class_filter: DEFAULT_CLASS_FILTER.to_string(),
            skip_option_types: vec!["PUT".to_string(), "CALL".to_string()],
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            combined_file: DEFAULT_COMBINED_FILE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_config_json(v: &Value) -> Result<Self> {
        let mut cfg = PipelineConfig::default();

        if let Some(n) = v.pointer("/pipeline/batch_size") {
            let n = n
                .as_u64()
                .ok_or_else(|| anyhow!("/pipeline/batch_size must be a positive integer"))?;
            if n == 0 {
                return Err(anyhow!("/pipeline/batch_size must be >= 1"));
            }
            cfg.batch_size = n as usize;
        }
        if let Some(s) = str_at(v, "/pipeline/filing_order")? {
            cfg.filing_order = FilingOrder::parse(s)?;
        }
        if let Some(s) = str_at(v, "/pipeline/empty_filing_policy")? {
            cfg.empty_filing_policy = EmptyFilingPolicy::parse(s)?;
        }
        if let Some(s) = str_at(v, "/ingest/class_filter")? {
            cfg.class_filter = s.to_string();
        }
        if let Some(arr) = v.pointer("/ingest/skip_option_types") {
            let arr = arr
                .as_array()
                .ok_or_else(|| anyhow!("/ingest/skip_option_types must be a list"))?;
            cfg.skip_option_types = arr
                .iter()
                .map(|x| {
                    x.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| anyhow!("/ingest/skip_option_types entries must be strings"))
                })
                .collect::<Result<_>>()?;
        }
        if let Some(s) = str_at(v, "/output/dir")? {
            cfg.output_dir = s.to_string();
        }
        if let Some(s) = str_at(v, "/output/combined_file")? {
            cfg.combined_file = s.to_string();
        }

        Ok(cfg)
    }
}

fn str_at<'a>(v: &'a Value, ptr: &str) -> Result<Option<&'a str>> {
    match v.pointer(ptr) {
        None => Ok(None),
        Some(x) => x
            .as_str()
            .map(Some)
            .ok_or_else(|| anyhow!("{ptr} must be a string")),
    }
}
