//! Aggregates over an inferred transaction history.
//!
//! Quarter labels arrive as printed on the filing index (`"Q3 2024"`); they
//! are normalized to `"2024Q3"` so they sort chronologically as text.

use std::collections::{BTreeMap, BTreeSet};

use crate::normalizer::parse_grouped_integer;
use crate::types::Transaction;

/// Rewrite `"Q3 2024"` as `"2024Q3"`. Labels in any other shape are returned
/// trimmed but otherwise unchanged.
pub fn normalize_quarter(label: &str) -> String {
    let label = label.trim();
    let mut parts = label.split_whitespace();
    if let (Some(q), Some(year), None) = (parts.next(), parts.next(), parts.next()) {
        let q_ok = q.len() == 2 && q.starts_with('Q') && q[1..].chars().all(|c| c.is_ascii_digit());
        let y_ok = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());
        if q_ok && y_ok {
            return format!("{year}{q}");
        }
    }
    label.to_string()
}

/// `(year, quarter)` for a normalized `"2024Q3"` label.
pub fn quarter_sort_key(label: &str) -> Option<(i32, u32)> {
    let (year, q) = label.trim().split_once('Q')?;
    Some((year.parse().ok()?, q.parse().ok()?))
}

/// One transaction reduced to the columns the aggregates need.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub fund_name: String,
    /// Normalized quarter label.
    pub quarter: String,
    pub symbol: String,
    /// Reported value in $000; `None` when blank or unparsable.
    pub value: Option<i64>,
    pub pct_change: Option<f64>,
}

impl SummaryRow {
    pub fn new(
        fund_name: &str,
        quarter: &str,
        symbol: &str,
        reported_value: &str,
        pct_change: Option<f64>,
    ) -> Self {
        let value = if reported_value.trim().is_empty() {
            None
        } else {
            parse_grouped_integer(reported_value, "value").ok()
        };
        Self {
            fund_name: fund_name.to_string(),
            quarter: normalize_quarter(quarter),
            symbol: symbol.to_string(),
            value,
            pct_change,
        }
    }

    /// Rows without a value, symbol, fund or quarter do not take part in any
    /// aggregate.
    fn is_complete(&self) -> bool {
        self.value.is_some()
            && !self.symbol.trim().is_empty()
            && !self.fund_name.trim().is_empty()
            && !self.quarter.is_empty()
    }
}

impl From<&Transaction> for SummaryRow {
    fn from(t: &Transaction) -> Self {
        SummaryRow::new(
            &t.fund_name,
            &t.quarter,
            &t.symbol,
            &t.reported_value,
            t.pct_change,
        )
    }
}

/// Selection applied before aggregating. Empty lists select everything.
#[derive(Clone, Debug, Default)]
pub struct SummaryFilter {
    pub funds: Vec<String>,
    /// Normalized or raw quarter label.
    pub quarter: Option<String>,
    pub symbols: Vec<String>,
}

impl SummaryFilter {
    fn matches(&self, row: &SummaryRow) -> bool {
        let fund_ok = self.funds.is_empty() || self.funds.iter().any(|f| *f == row.fund_name);
        let quarter_ok = self
            .quarter
            .as_deref()
            .map_or(true, |q| normalize_quarter(q) == row.quarter);
        let symbol_ok = self.symbols.is_empty() || self.symbols.iter().any(|s| *s == row.symbol);
        fund_ok && quarter_ok && symbol_ok
    }
}

/// Headline figures for a filtered slice of the history.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionSummary {
    pub transaction_count: usize,
    /// Sum of reported values, $000.
    pub total_value: i64,
    pub unique_symbols: usize,
    pub mean_pct_change: Option<f64>,
    /// Sample standard deviation (n - 1); `None` with fewer than two values.
    pub stddev_pct_change: Option<f64>,
}

pub fn summarize(rows: &[SummaryRow], filter: &SummaryFilter) -> TransactionSummary {
    let selected: Vec<&SummaryRow> = rows
        .iter()
        .filter(|r| r.is_complete() && filter.matches(r))
        .collect();

    let total_value = selected.iter().filter_map(|r| r.value).sum();
    let unique_symbols = selected
        .iter()
        .map(|r| r.symbol.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let pcts: Vec<f64> = selected
        .iter()
        .filter_map(|r| r.pct_change)
        .filter(|p| p.is_finite())
        .collect();

    TransactionSummary {
        transaction_count: selected.len(),
        total_value,
        unique_symbols,
        mean_pct_change: mean(&pcts),
        stddev_pct_change: sample_stddev(&pcts),
    }
}

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

fn sample_stddev(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    Some(var.sqrt())
}

/// Total reported value of one fund in one quarter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundQuarterValue {
    pub quarter: String,
    pub fund_name: String,
    pub total_value: i64,
}

/// Value per (quarter, fund) over the quarters in which any of `funds`
/// reported, missing combinations filled with zero. Quarters are ordered
/// chronologically, funds as given in `funds`.
pub fn fund_value_by_quarter(rows: &[SummaryRow], funds: &[String]) -> Vec<FundQuarterValue> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    let mut quarters: BTreeSet<String> = BTreeSet::new();

    let selected = rows
        .iter()
        .filter(|r| r.is_complete() && funds.iter().any(|f| *f == r.fund_name));
    for r in selected {
        quarters.insert(r.quarter.clone());
        *totals
            .entry((r.quarter.clone(), r.fund_name.clone()))
            .or_insert(0) += r.value.unwrap_or(0);
    }

    let mut quarters: Vec<String> = quarters.into_iter().collect();
    quarters.sort_by_key(|q| quarter_sort_key(q).unwrap_or((i32::MAX, u32::MAX)));

    let mut out = Vec::with_capacity(quarters.len() * funds.len());
    for q in &quarters {
        for f in funds {
            out.push(FundQuarterValue {
                quarter: q.clone(),
                fund_name: f.clone(),
                total_value: totals
                    .get(&(q.clone(), f.clone()))
                    .copied()
                    .unwrap_or(0),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fund: &str, q: &str, sym: &str, value: &str, pct: Option<f64>) -> SummaryRow {
        SummaryRow::new(fund, q, sym, value, pct)
    }

    #[test]
    fn quarter_labels_normalized() {
        assert_eq!(normalize_quarter("Q3 2024"), "2024Q3");
        assert_eq!(normalize_quarter(" Q1 2023 "), "2023Q1");
        assert_eq!(normalize_quarter("2024Q3"), "2024Q3");
        assert_eq!(normalize_quarter("2024-09-30"), "2024-09-30");
    }

    #[test]
    fn quarter_sort_key_parses_normalized_labels() {
        assert_eq!(quarter_sort_key("2024Q3"), Some((2024, 3)));
        assert_eq!(quarter_sort_key("garbage"), None);
    }

    #[test]
    fn summary_over_filtered_rows() {
        let rows = vec![
            row("A", "Q3 2024", "AAPL", "1,000", Some(10.0)),
            row("A", "Q3 2024", "MSFT", "500", Some(30.0)),
            row("A", "Q3 2024", "AAPL", "250", None),
            row("B", "Q3 2024", "TSLA", "9,999", Some(-100.0)),
            row("A", "Q2 2024", "AAPL", "700", Some(5.0)),
            row("A", "Q3 2024", "NVDA", "", Some(99.0)),
        ];
        let filter = SummaryFilter {
            funds: vec!["A".to_string()],
            quarter: Some("Q3 2024".to_string()),
            symbols: vec![],
        };

        let s = summarize(&rows, &filter);
        assert_eq!(s.transaction_count, 3);
        assert_eq!(s.total_value, 1750);
        assert_eq!(s.unique_symbols, 2);
        assert_eq!(s.mean_pct_change, Some(20.0));
        let sd = s.stddev_pct_change.unwrap();
        assert!((sd - 200f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn stddev_needs_two_values() {
        let rows = vec![row("A", "Q1 2024", "X", "1", Some(3.0))];
        let s = summarize(&rows, &SummaryFilter::default());
        assert_eq!(s.mean_pct_change, Some(3.0));
        assert_eq!(s.stddev_pct_change, None);
    }

    #[test]
    fn fund_value_grid_fills_zeros_in_quarter_order() {
        let rows = vec![
            row("A", "Q1 2025", "X", "10", None),
            row("A", "Q4 2024", "X", "5", None),
            row("A", "Q4 2024", "Y", "5", None),
            row("B", "Q1 2025", "Z", "7", None),
        ];
        let funds = vec!["A".to_string(), "B".to_string()];
        let grid = fund_value_by_quarter(&rows, &funds);

        let flat: Vec<(&str, &str, i64)> = grid
            .iter()
            .map(|v| (v.quarter.as_str(), v.fund_name.as_str(), v.total_value))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("2024Q4", "A", 10),
                ("2024Q4", "B", 0),
                ("2025Q1", "A", 10),
                ("2025Q1", "B", 7),
            ]
        );
    }

    #[test]
    fn fund_value_grid_ignores_quarters_of_unselected_funds() {
        let rows = vec![
            row("A", "Q4 2024", "X", "5", None),
            row("C", "Q1 2025", "Z", "7", None),
        ];
        let grid = fund_value_by_quarter(&rows, &["A".to_string()]);

        let quarters: Vec<&str> = grid.iter().map(|v| v.quarter.as_str()).collect();
        assert_eq!(quarters, vec!["2024Q4"], "no all-zero row for a quarter only C reported");
    }
}
