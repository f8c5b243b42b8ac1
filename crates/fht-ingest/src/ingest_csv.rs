//! CSV ingestion of disclosed holdings.
//!
//! Reads a flat export (one row per position, all funds and filings in one
//! file) into [`RawHolding`] values. Nothing is validated beyond the header:
//! share counts and CUSIPs are checked later by `Holding::from_raw`.
//!
//! ## CSV column contract (case-insensitive, order-independent)
//!
//! | Field            | Accepted headers                           |
//! |------------------|--------------------------------------------|
//! | fund name        | `fund_name`, `manager_name`                |
//! | quarter          | `quarter`                                  |
//! | filing date      | `filing_date`, `date_filed`                |
//! | security id      | `CUSIP`, `security_id`                     |
//! | symbol           | `Sym`, `symbol`, `stock_symbol`            |
//! | instrument class | `Cl`, `Class`                              |
//! | value ($000)     | `Value ($000)`, `value_($000)`, `value`    |
//! | shares           | `Shares`                                   |
//! | option type      | `Option Type`, `option_type` (optional)    |

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use fht_holdings::RawHolding;

/// Errors produced by CSV parsing in this module.
#[derive(Debug)]
pub enum CsvIngestError {
    /// The file could not be opened or read.
    Io(String),
    /// A structural CSV error (bad quoting, ragged row, invalid UTF-8).
    Csv { row: usize, msg: String },
    /// The header row is missing a required column.
    MissingHeader(&'static str),
}

impl fmt::Display for CsvIngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvIngestError::Io(msg) => write!(f, "csv io error: {msg}"),
            CsvIngestError::Csv { row, msg } => write!(f, "csv row {row}: {msg}"),
            CsvIngestError::MissingHeader(col) => {
                write!(f, "csv missing required header column: '{col}'")
            }
        }
    }
}

impl std::error::Error for CsvIngestError {}

#[derive(Debug, Clone, Copy)]
enum Field {
    FundName,
    Quarter,
    FilingDate,
    SecurityId,
    Symbol,
    SecurityClass,
    ReportedValue,
    Shares,
    OptionType,
}

impl Field {
    const REQUIRED: [Field; 8] = [
        Field::FundName,
        Field::Quarter,
        Field::FilingDate,
        Field::SecurityId,
        Field::Symbol,
        Field::SecurityClass,
        Field::ReportedValue,
        Field::Shares,
    ];

    fn name(self) -> &'static str {
        match self {
            Field::FundName => "fund_name",
            Field::Quarter => "quarter",
            Field::FilingDate => "filing_date",
            Field::SecurityId => "cusip",
            Field::Symbol => "sym",
            Field::SecurityClass => "cl",
            Field::ReportedValue => "value ($000)",
            Field::Shares => "shares",
            Field::OptionType => "option type",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::FundName => &["fund_name", "manager_name"],
            Field::Quarter => &["quarter"],
            Field::FilingDate => &["filing_date", "date_filed"],
            Field::SecurityId => &["cusip", "security_id"],
            Field::Symbol => &["sym", "symbol", "stock_symbol"],
            Field::SecurityClass => &["cl", "class"],
            Field::ReportedValue => &["value ($000)", "value_($000)", "value"],
            Field::Shares => &["shares"],
            Field::OptionType => &["option type", "option_type"],
        }
    }
}

/// Resolved column positions for one file.
struct ColumnIndex {
    cols: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn build(headers: &csv::StringRecord) -> Result<Self, CsvIngestError> {
        let by_name: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase(), i))
            .collect();

        let resolve = |f: Field| f.aliases().iter().find_map(|a| by_name.get(*a).copied());

        let mut cols = HashMap::new();
        for f in Field::REQUIRED {
            let i = resolve(f).ok_or(CsvIngestError::MissingHeader(f.name()))?;
            cols.insert(f.name(), i);
        }
        if let Some(i) = resolve(Field::OptionType) {
            cols.insert(Field::OptionType.name(), i);
        }
        Ok(Self { cols })
    }

    fn get(&self, rec: &csv::StringRecord, f: Field) -> String {
        self.cols
            .get(f.name())
            .and_then(|&i| rec.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

/// Parse a holdings CSV file at `path`.
pub fn parse_holdings_csv_file(path: &Path) -> Result<Vec<RawHolding>, CsvIngestError> {
    let file = std::fs::File::open(path)
        .map_err(|e| CsvIngestError::Io(format!("open '{}': {e}", path.display())))?;
    parse_holdings_reader(file)
}

/// Parse holdings CSV from a string slice (tests, stdin).
pub fn parse_holdings_csv_str(src: &str) -> Result<Vec<RawHolding>, CsvIngestError> {
    parse_holdings_reader(src.as_bytes())
}

fn parse_holdings_reader<R: std::io::Read>(rdr: R) -> Result<Vec<RawHolding>, CsvIngestError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(rdr);

    let headers = match rdr.headers() {
        Ok(h) if h.is_empty() => return Ok(Vec::new()),
        Ok(h) => h.clone(),
        Err(e) => {
            return Err(CsvIngestError::Csv {
                row: 0,
                msg: e.to_string(),
            })
        }
    };
    let idx = ColumnIndex::build(&headers)?;

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        // 1-based data rows, header = 0
        let rec = rec.map_err(|e| CsvIngestError::Csv {
            row: i + 1,
            msg: e.to_string(),
        })?;
        if rec.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        out.push(RawHolding {
            fund_name: idx.get(&rec, Field::FundName),
            quarter: idx.get(&rec, Field::Quarter),
            filing_date: idx.get(&rec, Field::FilingDate),
            security_id: idx.get(&rec, Field::SecurityId),
            symbol: idx.get(&rec, Field::Symbol),
            security_class: idx.get(&rec, Field::SecurityClass),
            reported_value: idx.get(&rec, Field::ReportedValue),
            shares: idx.get(&rec, Field::Shares),
            option_type: idx.get(&rec, Field::OptionType),
        });
    }

    Ok(out)
}
