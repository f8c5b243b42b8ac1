//! Sequential diff of one fund's filings.

use anyhow::{anyhow, Context, Result};
use fht_config::{EmptyFilingPolicy, PipelineConfig};
use fht_holdings::{diff_snapshots, index_raw_holdings, FilingContext, Snapshot, Transaction};
use fht_ingest::{
    build_filing_quality_report, ClassFilter, FilingQualityReport, FilingSource, FundRef,
};
use tracing::{debug, error, info, warn};

use crate::order::order_filings;

/// Outcome of diffing every filing of one fund.
#[derive(Debug, Clone)]
pub struct FundRun {
    pub fund: FundRef,
    /// Filing batches concatenated in filing order.
    pub transactions: Vec<Transaction>,
    pub filings_processed: usize,
    pub filings_skipped: usize,
    /// Reports that were not clean, in filing order.
    pub quality_issues: Vec<FilingQualityReport>,
}

pub fn class_filter_for(cfg: &PipelineConfig) -> ClassFilter {
    ClassFilter::new(&cfg.class_filter, &cfg.skip_option_types)
}

/// Diff a fund's filings oldest to newest. Any fetch, ordering or parse
/// error aborts the whole fund: no transactions are returned for it.
pub fn run_fund(source: &dyn FilingSource, fund: &FundRef, cfg: &PipelineConfig) -> Result<FundRun> {
    let filter = class_filter_for(cfg);

    let filings = source
        .filings(fund)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("list filings failed for fund '{}'", fund.fund_name))?;
    let filings = order_filings(filings, cfg.filing_order)
        .with_context(|| format!("order filings failed for fund '{}'", fund.fund_name))?;
    info!(fund = %fund.fund_name, filings = filings.len(), "diffing fund");

    let mut run = FundRun {
        fund: fund.clone(),
        transactions: Vec::new(),
        filings_processed: 0,
        filings_skipped: 0,
        quality_issues: Vec::new(),
    };
    let mut previous: Option<Snapshot> = None;

    for filing in &filings {
        let rows = source
            .holdings(filing)
            .map_err(|e| anyhow!(e))
            .with_context(|| {
                format!("fetch holdings failed: fund='{}' quarter='{}'", fund.fund_name, filing.quarter)
            })?;
        let rows = filter.apply(rows);

        let report = build_filing_quality_report(filing, &rows);
        for dup in &report.duplicates {
            warn!(
                fund = %fund.fund_name,
                quarter = %filing.quarter,
                security_id = %dup.security_id,
                count = dup.count,
                "duplicate security id in filing; last occurrence wins"
            );
        }
        if report.has_fatal_issues() {
            error!(
                fund = %fund.fund_name,
                quarter = %filing.quarter,
                blank_security_ids = report.blank_security_ids,
                bad_share_counts = report.bad_share_counts.len(),
                "filing cannot be diffed"
            );
        }
        if !report.is_clean() {
            run.quality_issues.push(report);
        }

        let current = index_raw_holdings(rows).map_err(|e| anyhow!(e)).with_context(|| {
            format!("invalid holdings: fund='{}' quarter='{}'", fund.fund_name, filing.quarter)
        })?;

        let ctx = FilingContext::new(&fund.fund_name, &filing.quarter, &filing.filing_date);

        if current.is_empty() {
            match cfg.empty_filing_policy {
                EmptyFilingPolicy::Reset => {
                    debug!(fund = %fund.fund_name, quarter = %filing.quarter, "empty filing resets baseline");
                    run.filings_skipped += 1;
                    previous = Some(current);
                    continue;
                }
                EmptyFilingPolicy::Skip => {
                    debug!(fund = %fund.fund_name, quarter = %filing.quarter, "empty filing skipped");
                    run.filings_skipped += 1;
                    continue;
                }
                EmptyFilingPolicy::Liquidate => {}
            }
        }

        let batch = diff_snapshots(previous.as_ref(), &current, &ctx);
        info!(
            fund = %fund.fund_name,
            quarter = %filing.quarter,
            holdings = current.len(),
            transactions = batch.len(),
            "filing diffed"
        );
        run.transactions.extend(batch);
        run.filings_processed += 1;
        previous = Some(current);
    }

    Ok(run)
}
