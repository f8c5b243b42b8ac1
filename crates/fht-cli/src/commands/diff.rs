use std::io;

use anyhow::{anyhow, Context, Result};
use fht_artifacts::write_transactions_csv;
use fht_holdings::{diff_holdings, index_holdings, Holding};
use fht_ingest::ClassFilter;
use tracing::{info, warn};

use super::read_holdings;

fn load_holdings(path: &str, filter: Option<&ClassFilter>) -> Result<Vec<Holding>> {
    let mut rows = read_holdings(path)?;
    if let Some(f) = filter {
        rows = f.apply(rows);
    }
    let holdings = rows
        .into_iter()
        .map(Holding::from_raw)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("invalid holdings in {}", path))?;

    for id in index_holdings(holdings.iter().cloned()).duplicates() {
        warn!(file = path, security_id = %id, "duplicate security id; last occurrence wins");
    }
    Ok(holdings)
}

/// `fht diff`: provenance comes from the first row of the current file, so
/// an empty current file prints only the header.
pub fn run_diff(previous: Option<&str>, current: &str, no_filter: bool) -> Result<()> {
    let filter = (!no_filter).then(ClassFilter::default);

    let cur = load_holdings(current, filter.as_ref())?;
    let prev = previous
        .map(|p| load_holdings(p, filter.as_ref()))
        .transpose()?;

    let txns = diff_holdings(prev.as_deref(), &cur);
    info!(holdings = cur.len(), transactions = txns.len(), "diff done");

    write_transactions_csv(io::stdout().lock(), &txns).context("write diff output failed")?;
    Ok(())
}
