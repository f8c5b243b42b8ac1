//! Holdings-diff engine: scenario and property checks.
//!
//! GREEN when:
//! - every security id of previous ∪ current appears in exactly one transaction
//! - disappearances are full sells of the prior count
//! - identical snapshots produce only zero-delta HOLDs
//! - a zero baseline never produces a division error or infinity
//! - the first filing of a fund is all BUYs with no percentage change

use std::collections::{BTreeMap, BTreeSet};

use fht_holdings::*;

const FUND: &str = "ACME CAPITAL LLC";

fn filing(quarter: &str, date: &str) -> FilingContext {
    FilingContext::new(FUND, quarter, date)
}

fn raw(cusip: &str, shares: &str, quarter: &str, date: &str) -> RawHolding {
    RawHolding {
        fund_name: FUND.to_string(),
        quarter: quarter.to_string(),
        filing_date: date.to_string(),
        security_id: cusip.to_string(),
        symbol: format!("T{cusip}"),
        security_class: "COM".to_string(),
        reported_value: "100".to_string(),
        shares: shares.to_string(),
        option_type: String::new(),
    }
}

fn snap(positions: &[(&str, i64)], quarter: &str, date: &str) -> Snapshot {
    index_raw_holdings(
        positions
            .iter()
            .map(|(id, n)| raw(id, &n.to_string(), quarter, date)),
    )
    .unwrap()
}

fn prev(positions: &[(&str, i64)]) -> Snapshot {
    snap(positions, "Q1 2024", "2024-05-15")
}

fn cur(positions: &[(&str, i64)]) -> Snapshot {
    snap(positions, "Q2 2024", "2024-08-14")
}

fn q2() -> FilingContext {
    filing("Q2 2024", "2024-08-14")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_full_exit_is_sell_of_everything() {
    let out = diff_snapshots(Some(&prev(&[("X", 100)])), &cur(&[]), &q2());

    assert_eq!(out.len(), 1);
    let t = &out[0];
    assert_eq!(t.security_id, "X");
    assert_eq!(t.transaction_type, TransactionType::Sell);
    assert_eq!(t.share_delta, -100);
    assert_eq!(t.pct_change, Some(-100.0));
}

#[test]
fn scenario_b_increase_is_buy_with_pct() {
    let out = diff_snapshots(Some(&prev(&[("X", 100)])), &cur(&[("X", 150)]), &q2());

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].transaction_type, TransactionType::Buy);
    assert_eq!(out[0].share_delta, 50);
    assert_eq!(out[0].pct_change, Some(50.0));
}

#[test]
fn scenario_c_hold_and_new_position() {
    let out = diff_snapshots(
        Some(&prev(&[("X", 100)])),
        &cur(&[("X", 100), ("Y", 10)]),
        &q2(),
    );

    assert_eq!(out.len(), 2);
    let x = out.iter().find(|t| t.security_id == "X").unwrap();
    assert_eq!(x.transaction_type, TransactionType::Hold);
    assert_eq!(x.share_delta, 0);
    assert_eq!(x.pct_change, Some(0.0));

    let y = out.iter().find(|t| t.security_id == "Y").unwrap();
    assert_eq!(y.transaction_type, TransactionType::Buy);
    assert_eq!(y.share_delta, 10);
    assert_eq!(y.pct_change, None);
}

#[test]
fn scenario_d_first_filing_is_all_buys() {
    let out = diff_snapshots(None, &cur(&[("X", 200)]), &q2());

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].transaction_type, TransactionType::Buy);
    assert_eq!(out[0].share_delta, 200);
    assert_eq!(out[0].pct_change, None);
}

#[test]
fn scenario_e_share_count_normalization() {
    assert_eq!(parse_share_count("1,234").unwrap(), 1234);
    assert_eq!(parse_share_count("").unwrap(), 0);
}

#[test]
fn reduction_is_sell_with_negative_pct() {
    let out = diff_snapshots(Some(&prev(&[("X", 200)])), &cur(&[("X", 50)]), &q2());
    assert_eq!(out[0].transaction_type, TransactionType::Sell);
    assert_eq!(out[0].share_delta, -150);
    assert_eq!(out[0].pct_change, Some(-75.0));
}

#[test]
fn sell_reported_under_current_filing() {
    let out = diff_snapshots(Some(&prev(&[("X", 100)])), &cur(&[("Y", 1)]), &q2());
    let sell = out.iter().find(|t| t.security_id == "X").unwrap();
    assert_eq!(sell.quarter, "Q2 2024");
    assert_eq!(sell.filing_date, "2024-08-14");
    assert_eq!(sell.fund_name, FUND);
}

// ============================================================================
// Properties
// ============================================================================

/// A handful of snapshot pairs covering overlap, disjointness, zero counts
/// and empties.
fn pairs() -> Vec<(Vec<(&'static str, i64)>, Vec<(&'static str, i64)>)> {
    vec![
        (vec![], vec![]),
        (vec![("A", 1)], vec![]),
        (vec![], vec![("A", 1)]),
        (vec![("A", 10), ("B", 0), ("C", 7)], vec![("C", 7), ("D", 3), ("B", 5)]),
        (vec![("A", 10), ("B", 20)], vec![("A", 5), ("B", 40)]),
        (vec![("A", 0)], vec![("A", 0)]),
        (vec![("A", 1), ("B", 2)], vec![("C", 3), ("D", 4)]),
    ]
}

#[test]
fn p1_every_id_appears_exactly_once() {
    for (p, c) in pairs() {
        let out = diff_snapshots(Some(&prev(&p)), &cur(&c), &q2());

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for t in &out {
            *counts.entry(t.security_id.as_str()).or_insert(0) += 1;
        }
        let expected: BTreeSet<&str> = p.iter().chain(c.iter()).map(|(id, _)| *id).collect();

        assert_eq!(counts.keys().copied().collect::<BTreeSet<_>>(), expected);
        assert!(counts.values().all(|&n| n == 1), "duplicate emission: {counts:?}");
    }
}

#[test]
fn p2_disappearances_are_full_sells() {
    for (p, c) in pairs() {
        let out = diff_snapshots(Some(&prev(&p)), &cur(&c), &q2());
        for (id, n) in &p {
            if c.iter().any(|(cid, _)| cid == id) {
                continue;
            }
            let t = out.iter().find(|t| t.security_id == *id).unwrap();
            assert_eq!(t.transaction_type, TransactionType::Sell);
            assert_eq!(t.share_delta, -n);
        }
    }
}

#[test]
fn p3_identical_snapshots_are_all_holds() {
    let positions = [("A", 10), ("B", 0), ("C", 1_000_000)];
    let out = diff_snapshots(Some(&prev(&positions)), &cur(&positions), &q2());

    assert_eq!(out.len(), 3);
    for t in &out {
        assert_eq!(t.transaction_type, TransactionType::Hold);
        assert_eq!(t.share_delta, 0);
        assert_eq!(t.pct_change, Some(0.0));
    }
}

#[test]
fn p4_zero_baseline_is_zero_pct() {
    let out = diff_snapshots(Some(&prev(&[("A", 0)])), &cur(&[("A", 500)]), &q2());

    assert_eq!(out[0].transaction_type, TransactionType::Buy);
    assert_eq!(out[0].share_delta, 500);
    assert_eq!(out[0].pct_change, Some(0.0));
    for (p, c) in pairs() {
        for t in diff_snapshots(Some(&prev(&p)), &cur(&c), &q2()) {
            if let Some(pct) = t.pct_change {
                assert!(pct.is_finite());
            }
        }
    }
}

#[test]
fn p5_absent_previous_is_all_buys_without_pct() {
    for (_, c) in pairs() {
        for t in diff_snapshots(None, &cur(&c), &q2()) {
            assert_eq!(t.transaction_type, TransactionType::Buy);
            assert_eq!(t.pct_change, None);
        }
    }
}

#[test]
fn malformed_row_fails_fast() {
    let rows = vec![
        raw("A", "100", "Q2 2024", "2024-08-14"),
        raw("B", "one hundred", "Q2 2024", "2024-08-14"),
    ];
    let err = index_raw_holdings(rows).unwrap_err();
    assert!(matches!(err, HoldingsError::Parse { field: "shares", .. }));
}
