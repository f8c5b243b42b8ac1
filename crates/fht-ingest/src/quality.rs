//! Data-quality report for the holdings rows of one filing.
//!
//! Covers:
//! - row count
//! - blank security ids (would be a schema error in the diff)
//! - duplicate security ids (last occurrence wins in the snapshot)
//! - share counts that do not normalize (would be a parse error in the diff)
//!
//! The report is informational. It does not drop or repair rows.

use std::collections::BTreeMap;

use fht_holdings::{parse_share_count, RawHolding};

use crate::source::FilingRef;

/// A security id that appeared more than once in one filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIssue {
    pub security_id: String,
    /// How many times the id appears (always >= 2).
    pub count: usize,
}

/// A share count that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCountIssue {
    pub security_id: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingQualityReport {
    pub filing: FilingRef,
    pub rows: usize,
    pub blank_security_ids: usize,
    /// Sorted by security id.
    pub duplicates: Vec<DuplicateIssue>,
    /// In row order.
    pub bad_share_counts: Vec<ShareCountIssue>,
}

impl FilingQualityReport {
    pub fn is_clean(&self) -> bool {
        self.blank_security_ids == 0
            && self.duplicates.is_empty()
            && self.bad_share_counts.is_empty()
    }

    /// Whether the diff would reject this filing outright.
    pub fn has_fatal_issues(&self) -> bool {
        self.blank_security_ids > 0 || !self.bad_share_counts.is_empty()
    }
}

pub fn build_filing_quality_report(filing: &FilingRef, rows: &[RawHolding]) -> FilingQualityReport {
    let mut blank = 0usize;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut bad_share_counts = Vec::new();

    for r in rows {
        let id = r.security_id.trim();
        if id.is_empty() {
            blank += 1;
        } else {
            *counts.entry(id).or_insert(0) += 1;
        }
        if parse_share_count(&r.shares).is_err() {
            bad_share_counts.push(ShareCountIssue {
                security_id: id.to_string(),
                raw: r.shares.clone(),
            });
        }
    }

    let duplicates = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, count)| DuplicateIssue {
            security_id: id.to_string(),
            count,
        })
        .collect();

    FilingQualityReport {
        filing: filing.clone(),
        rows: rows.len(),
        blank_security_ids: blank,
        duplicates,
        bad_share_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing() -> FilingRef {
        FilingRef {
            fund_id: "F".to_string(),
            fund_name: "F".to_string(),
            quarter: "Q1 2024".to_string(),
            filing_date: "2024-05-15".to_string(),
        }
    }

    fn row(cusip: &str, shares: &str) -> RawHolding {
        RawHolding {
            security_id: cusip.to_string(),
            shares: shares.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn clean_filing() {
        let r = build_filing_quality_report(&filing(), &[row("A", "1,000"), row("B", "")]);
        assert_eq!(r.rows, 2);
        assert!(r.is_clean());
        assert!(!r.has_fatal_issues());
    }

    #[test]
    fn duplicates_counted_and_sorted() {
        let r = build_filing_quality_report(
            &filing(),
            &[row("B", "1"), row("A", "1"), row("B", "2"), row("A", "3"), row("B", "4")],
        );
        assert_eq!(
            r.duplicates,
            vec![
                DuplicateIssue {
                    security_id: "A".to_string(),
                    count: 2
                },
                DuplicateIssue {
                    security_id: "B".to_string(),
                    count: 3
                },
            ]
        );
        assert!(!r.is_clean());
        assert!(!r.has_fatal_issues());
    }

    #[test]
    fn blank_ids_and_bad_shares_are_fatal() {
        let r = build_filing_quality_report(&filing(), &[row(" ", "1"), row("C", "lots")]);
        assert_eq!(r.blank_security_ids, 1);
        assert_eq!(r.bad_share_counts.len(), 1);
        assert_eq!(r.bad_share_counts[0].raw, "lots");
        assert!(r.has_fatal_issues());
    }
}
