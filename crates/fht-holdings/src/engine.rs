use crate::builder::{build_transaction, BuildArgs};
use crate::snapshot::{index_holdings, Snapshot};
use crate::types::{FilingContext, Holding, Transaction, TransactionType};

/// Percentage change against a prior share count. A zero baseline yields `0`
/// instead of dividing.
fn pct_of_baseline(delta: i64, baseline: i64) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    (delta as f64 / baseline as f64) * 100.0
}

/// Pass 1: every id held previously but absent now is a full sell.
fn compute_sells(
    previous: &Snapshot,
    current: &Snapshot,
    filing: &FilingContext,
    out: &mut Vec<Transaction>,
) {
    for old in previous.iter() {
        if current.contains(&old.security_id) {
            continue;
        }

        let old_shares = old.share_count;
        out.push(build_transaction(BuildArgs {
            holding: old,
            share_delta: -old_shares,
            pct_change: Some(if old_shares > 0 { -100.0 } else { 0.0 }),
            transaction_type: TransactionType::Sell,
            filing,
        }));
    }
}

/// Pass 2: every id held now is a new buy, or a buy/sell/hold against its
/// prior count.
fn compute_buys_and_holds(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    filing: &FilingContext,
    out: &mut Vec<Transaction>,
) {
    for new in current.iter() {
        let new_shares = new.share_count;
        let old = previous.and_then(|p| p.get(&new.security_id));

        let (share_delta, pct_change, transaction_type) = match old {
            Some(old) => {
                let delta = new_shares - old.share_count;
                (
                    delta,
                    Some(pct_of_baseline(delta, old.share_count)),
                    TransactionType::from_delta(delta),
                )
            }
            None => (new_shares, None, TransactionType::Buy),
        };

        out.push(build_transaction(BuildArgs {
            holding: new,
            share_delta,
            pct_change,
            transaction_type,
            filing,
        }));
    }
}

/// Diff two snapshots of one fund.
///
/// `previous == None` means this is the first filing seen for the fund: every
/// current holding is a BUY with no percentage change.
///
/// Output order: all disappearances (previous snapshot order), then all
/// current holdings (current snapshot order). Every id in
/// `previous ∪ current` appears exactly once.
pub fn diff_snapshots(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    filing: &FilingContext,
) -> Vec<Transaction> {
    let mut out = Vec::with_capacity(current.len() + previous.map_or(0, Snapshot::len));

    if let Some(prev) = previous {
        compute_sells(prev, current, filing, &mut out);
    }
    compute_buys_and_holds(previous, current, filing, &mut out);

    out
}

/// Diff two filings given as holding lists.
///
/// The filing context is taken from the first current holding, so an empty
/// current filing has nothing to report and yields no transactions.
pub fn diff_holdings(previous: Option<&[Holding]>, current: &[Holding]) -> Vec<Transaction> {
    let Some(first) = current.first() else {
        return Vec::new();
    };
    let filing = FilingContext::of(first);

    let prev_snap = previous.map(|p| index_holdings(p.iter().cloned()));
    let cur_snap = index_holdings(current.iter().cloned());

    diff_snapshots(prev_snap.as_ref(), &cur_snap, &filing)
}
