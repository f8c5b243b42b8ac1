use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalizer::parse_share_count;

/// Errors raised while turning raw filing rows into validated holdings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoldingsError {
    /// A share count or other numeric field could not be normalized.
    Parse { field: &'static str, raw: String },
    /// A required identity field is missing or blank.
    Schema {
        field: &'static str,
        fund_name: String,
        quarter: String,
    },
}

impl fmt::Display for HoldingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldingsError::Parse { field, raw } => {
                write!(f, "cannot parse field '{field}' from value '{raw}'")
            }
            HoldingsError::Schema {
                field,
                fund_name,
                quarter,
            } => write!(
                f,
                "holding is missing required field '{field}' (fund='{fund_name}' quarter='{quarter}')"
            ),
        }
    }
}

impl std::error::Error for HoldingsError {}

/// One holding row as handed over by the filing parser, before validation.
///
/// Every field is kept as text; nothing is interpreted until
/// [`Holding::from_raw`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawHolding {
    pub fund_name: String,
    pub quarter: String,
    pub filing_date: String,
    /// CUSIP.
    pub security_id: String,
    pub symbol: String,
    pub security_class: String,
    /// Market value in thousands of dollars, verbatim.
    pub reported_value: String,
    /// Share count text, may carry grouping separators (`"1,234"`).
    pub shares: String,
    /// `PUT` / `CALL` for option positions, empty otherwise.
    pub option_type: String,
}

/// A validated position within one filing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Holding {
    pub fund_name: String,
    pub quarter: String,
    pub filing_date: String,
    pub security_id: String,
    pub symbol: String,
    pub security_class: String,
    pub reported_value: String,
    /// Share count exactly as disclosed.
    pub shares_text: String,
    /// Normalized share count.
    pub share_count: i64,
}

impl Holding {
    /// Validate a raw row. A blank CUSIP is a schema error; a share count that
    /// does not normalize is a parse error.
    pub fn from_raw(raw: RawHolding) -> Result<Self, HoldingsError> {
        let security_id = raw.security_id.trim();
        if security_id.is_empty() {
            return Err(HoldingsError::Schema {
                field: "security_id",
                fund_name: raw.fund_name,
                quarter: raw.quarter,
            });
        }
        let share_count = parse_share_count(&raw.shares)?;

        Ok(Self {
            security_id: security_id.to_string(),
            fund_name: raw.fund_name,
            quarter: raw.quarter,
            filing_date: raw.filing_date,
            symbol: raw.symbol,
            security_class: raw.security_class,
            reported_value: raw.reported_value,
            shares_text: raw.shares,
            share_count,
        })
    }
}

/// Provenance of the filing currently being processed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilingContext {
    pub fund_name: String,
    pub quarter: String,
    pub filing_date: String,
}

impl FilingContext {
    pub fn new(
        fund_name: impl Into<String>,
        quarter: impl Into<String>,
        filing_date: impl Into<String>,
    ) -> Self {
        Self {
            fund_name: fund_name.into(),
            quarter: quarter.into(),
            filing_date: filing_date.into(),
        }
    }

    pub fn of(holding: &Holding) -> Self {
        Self::new(
            holding.fund_name.clone(),
            holding.quarter.clone(),
            holding.filing_date.clone(),
        )
    }
}

/// Inferred direction of a position change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Hold,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Hold => "HOLD",
        }
    }

    /// Classify a signed share delta.
    pub fn from_delta(delta: i64) -> Self {
        match delta {
            0 => TransactionType::Hold,
            d if d > 0 => TransactionType::Buy,
            _ => TransactionType::Sell,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inferred change for one security between two consecutive filings.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub fund_name: String,
    pub filing_date: String,
    pub quarter: String,
    pub security_id: String,
    pub symbol: String,
    pub security_class: String,
    pub reported_value: String,
    /// Share count text of the holding the transaction was built from.
    pub shares_text: String,
    pub shares: i64,
    pub share_delta: i64,
    /// `None` for a first-time buy (no baseline).
    pub pct_change: Option<f64>,
    pub transaction_type: TransactionType,
}
