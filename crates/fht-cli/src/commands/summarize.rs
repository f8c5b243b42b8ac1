use std::path::Path;

use anyhow::Result;
use fht_artifacts::read_transactions_csv;
use fht_holdings::summary::{fund_value_by_quarter, summarize, SummaryFilter, SummaryRow};

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "n/a".to_string())
}

pub fn run_summarize(
    input: &str,
    funds: Vec<String>,
    quarter: Option<String>,
    symbols: Vec<String>,
) -> Result<()> {
    let records = read_transactions_csv(Path::new(input))?;
    let rows: Vec<SummaryRow> = records.iter().map(|r| r.to_summary_row()).collect();

    let filter = SummaryFilter {
        funds: funds.clone(),
        quarter,
        symbols,
    };
    let s = summarize(&rows, &filter);

    println!("transactions={}", s.transaction_count);
    println!("total_value_000={}", s.total_value);
    println!("unique_symbols={}", s.unique_symbols);
    println!("mean_pct_change={}", fmt_opt(s.mean_pct_change));
    println!("stddev_pct_change={}", fmt_opt(s.stddev_pct_change));

    for v in fund_value_by_quarter(&rows, &funds) {
        println!("value quarter={} fund=\"{}\" total={}", v.quarter, v.fund_name, v.total_value);
    }
    Ok(())
}
