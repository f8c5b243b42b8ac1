//! Filing-source boundary.
//!
//! A [`FilingSource`] is whatever can enumerate funds, list a fund's filings
//! and hand back the holdings rows of one filing: a scraper, an archive of
//! exported tables, or a flat CSV. The pipeline owns one source value and
//! passes it by reference into every fetch; sources carry their own client
//! state (HTTP client, browser session) and release it on drop.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use fht_holdings::RawHolding;

use crate::ingest_csv::{parse_holdings_csv_file, CsvIngestError};

/// One fund (filing manager).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FundRef {
    /// Source-specific identifier.
    pub fund_id: String,
    pub fund_name: String,
}

/// One filing of one fund.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilingRef {
    pub fund_id: String,
    pub fund_name: String,
    pub quarter: String,
    pub filing_date: String,
}

/// Errors that a [`FilingSource`] implementation may return.
#[derive(Debug)]
pub enum SourceError {
    /// Network or transport failure.
    Transport(String),
    /// A page or file could not be decoded into rows.
    Decode(String),
    /// The requested fund or filing does not exist in this source.
    NotFound(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transport(msg) => write!(f, "transport error: {msg}"),
            SourceError::Decode(msg) => write!(f, "decode error: {msg}"),
            SourceError::NotFound(what) => write!(f, "not found: {what}"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<CsvIngestError> for SourceError {
    fn from(e: CsvIngestError) -> Self {
        SourceError::Decode(e.to_string())
    }
}

/// Upstream filing collaborator.
///
/// `Send + Sync` so one source can serve several funds being diffed
/// concurrently.
pub trait FilingSource: Send + Sync {
    /// Human-readable name identifying this source (e.g. `"csv"`).
    fn name(&self) -> &'static str;

    /// All funds known to the source.
    fn funds(&self) -> Result<Vec<FundRef>, SourceError>;

    /// Filings of one fund, in the order the source lists them. Callers
    /// order them before diffing.
    fn filings(&self, fund: &FundRef) -> Result<Vec<FilingRef>, SourceError>;

    /// Holdings rows of one filing, unfiltered.
    fn holdings(&self, filing: &FilingRef) -> Result<Vec<RawHolding>, SourceError>;
}

/// Source backed by one flat holdings CSV covering many funds and filings.
///
/// Funds are listed in order of first appearance; a fund's filings are the
/// distinct `(filing_date, quarter)` pairs in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct CsvFilingSource {
    funds: Vec<FundRef>,
    filings: HashMap<String, Vec<FilingRef>>,
    rows: HashMap<FilingRef, Vec<RawHolding>>,
}

impl CsvFilingSource {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        Ok(Self::from_rows(parse_holdings_csv_file(path)?))
    }

    pub fn from_rows(rows: Vec<RawHolding>) -> Self {
        let mut src = CsvFilingSource::default();

        for row in rows {
            let fund_id = row.fund_name.clone();
            if !src.filings.contains_key(&fund_id) {
                src.funds.push(FundRef {
                    fund_id: fund_id.clone(),
                    fund_name: row.fund_name.clone(),
                });
                src.filings.insert(fund_id.clone(), Vec::new());
            }

            let filing = FilingRef {
                fund_id: fund_id.clone(),
                fund_name: row.fund_name.clone(),
                quarter: row.quarter.clone(),
                filing_date: row.filing_date.clone(),
            };
            let entry = src.rows.entry(filing.clone()).or_default();
            if entry.is_empty() {
                if let Some(list) = src.filings.get_mut(&fund_id) {
                    list.push(filing);
                }
            }
            entry.push(row);
        }

        src
    }
}

impl FilingSource for CsvFilingSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn funds(&self) -> Result<Vec<FundRef>, SourceError> {
        Ok(self.funds.clone())
    }

    fn filings(&self, fund: &FundRef) -> Result<Vec<FilingRef>, SourceError> {
        self.filings
            .get(&fund.fund_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("fund '{}'", fund.fund_id)))
    }

    fn holdings(&self, filing: &FilingRef) -> Result<Vec<RawHolding>, SourceError> {
        self.rows.get(filing).cloned().ok_or_else(|| {
            SourceError::NotFound(format!(
                "filing fund='{}' quarter='{}' date='{}'",
                filing.fund_id, filing.quarter, filing.filing_date
            ))
        })
    }
}
