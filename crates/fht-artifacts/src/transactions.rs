use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fht_holdings::summary::SummaryRow;
use fht_holdings::{Transaction, TransactionType};
use serde::{Deserialize, Serialize};

/// Header of every transactions CSV, in column order.
pub const TRANSACTION_COLUMNS: [&str; 10] = [
    "fund_name",
    "filing_date",
    "quarter",
    "stock_symbol",
    "cl",
    "value_($000)",
    "shares",
    "change",
    "pct_change",
    "inferred_transaction_type",
];

/// One CSV row. Field order matches [`TRANSACTION_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub fund_name: String,
    pub filing_date: String,
    pub quarter: String,
    pub stock_symbol: String,
    pub cl: String,
    #[serde(rename = "value_($000)")]
    pub value_thousands: String,
    pub shares: i64,
    pub change: i64,
    /// Plain decimal text, empty when there was no baseline.
    pub pct_change: String,
    pub inferred_transaction_type: TransactionType,
}

impl From<&Transaction> for TransactionRecord {
    fn from(t: &Transaction) -> Self {
        Self {
            fund_name: t.fund_name.clone(),
            filing_date: t.filing_date.clone(),
            quarter: t.quarter.clone(),
            stock_symbol: t.symbol.clone(),
            cl: t.security_class.clone(),
            value_thousands: t.reported_value.clone(),
            shares: t.shares,
            change: t.share_delta,
            pct_change: format_pct(t.pct_change),
            inferred_transaction_type: t.transaction_type,
        }
    }
}

impl TransactionRecord {
    pub fn pct_change_value(&self) -> Option<f64> {
        let s = self.pct_change.trim();
        if s.is_empty() {
            return None;
        }
        s.parse().ok()
    }

    pub fn to_summary_row(&self) -> SummaryRow {
        SummaryRow::new(
            &self.fund_name,
            &self.quarter,
            &self.stock_symbol,
            &self.value_thousands,
            self.pct_change_value(),
        )
    }
}

/// Render a percentage change. Whole numbers keep one decimal (`-100.0`),
/// others use the shortest exact representation.
pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        None => String::new(),
        Some(p) if p.is_finite() && p.fract() == 0.0 => format!("{p:.1}"),
        Some(p) => format!("{p}"),
    }
}

/// `transactions_batch_{start}-{end}.csv`
pub fn batch_file_name(start: usize, end: usize) -> String {
    format!("transactions_batch_{start}-{end}.csv")
}

fn batch_start(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix("transactions_batch_")?
        .split('-')
        .next()?
        .parse()
        .ok()
}

/// Write header + one row per transaction. The header is written even when
/// `txns` is empty. Returns the number of data rows.
pub fn write_transactions_csv<W: io::Write>(w: W, txns: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
    wtr.write_record(TRANSACTION_COLUMNS)
        .context("write transactions header failed")?;
    for t in txns {
        wtr.serialize(TransactionRecord::from(t))
            .context("write transaction row failed")?;
    }
    wtr.flush().context("flush transactions csv failed")?;
    Ok(txns.len())
}

pub fn write_transactions_file(path: &Path, txns: &[Transaction]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir failed: {}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("create transactions csv failed: {}", path.display()))?;
    write_transactions_csv(io::BufWriter::new(file), txns)
}

pub fn read_transactions_csv(path: &Path) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("open transactions csv: {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.deserialize() {
        let r: TransactionRecord = rec.context("deserialize TransactionRecord failed")?;
        out.push(r);
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineResult {
    pub files: Vec<PathBuf>,
    pub rows: usize,
}

/// Concatenate every `*.csv` in `dir` (except `out` itself) into `out`,
/// keeping a single header. Batch files are ordered by batch start, other
/// files by name after them. All inputs must share the same header.
pub fn combine_csv_files(dir: &Path, out: &Path) -> Result<CombineResult> {
    // `out` may already exist from an earlier run; never read it back into itself.
    let out_existing = fs::canonicalize(out).ok();

    let mut inputs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir failed: {}", dir.display()))? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        if out_existing.is_some() && fs::canonicalize(&path).ok() == out_existing {
            continue;
        }
        inputs.push(path);
    }
    inputs.sort_by_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        (batch_start(&name).unwrap_or(usize::MAX), name)
    });

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir failed: {}", parent.display()))?;
        }
    }
    let file = fs::File::create(out)
        .with_context(|| format!("create combined csv failed: {}", out.display()))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(io::BufWriter::new(file));

    let mut header: Option<csv::StringRecord> = None;
    let mut rows = 0usize;
    for path in &inputs {
        let mut rdr = csv::Reader::from_path(path)
            .with_context(|| format!("open csv: {}", path.display()))?;
        let h = rdr.headers()?.clone();
        if let Some(first) = &header {
            if *first != h {
                bail!("header mismatch in {}: {:?} vs {:?}", path.display(), h, first);
            }
        } else {
            wtr.write_record(&h)?;
            header = Some(h);
        }
        for rec in rdr.records() {
            let rec = rec.with_context(|| format!("read csv row: {}", path.display()))?;
            wtr.write_record(&rec)?;
            rows += 1;
        }
    }
    wtr.flush()?;

    Ok(CombineResult {
        files: inputs,
        rows,
    })
}
