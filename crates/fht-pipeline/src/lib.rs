//! fht-pipeline
//!
//! Drives the diff engine over every fund a [`FilingSource`] knows about.
//!
//! Funds are processed in batches of `batch_size`. Funds inside a batch are
//! independent and run concurrently on the blocking pool; a fund's own
//! filings are always diffed strictly in order. Each batch is handed to a
//! single [`BatchSink`] once all of its funds are done, so output files have
//! exactly one writer.

mod fund;
mod order;
mod sink;

pub use fund::{class_filter_for, run_fund, FundRun};
pub use order::{order_filings, parse_filing_date};
pub use sink::{BatchSink, CsvBatchSink};

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use fht_config::PipelineConfig;
use fht_holdings::Transaction;
use fht_ingest::{FilingSource, FundRef};
use tokio::task::JoinSet;
use tracing::{error, info};

/// A fund whose pipeline was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundFailure {
    pub fund_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub funds_total: usize,
    pub funds_succeeded: usize,
    pub funds_failed: Vec<FundFailure>,
    pub transactions_written: usize,
    /// Names returned by the sink, in batch order.
    pub batch_files: Vec<String>,
    /// Filings whose quality report was not clean.
    pub filings_with_issues: usize,
}

impl RunReport {
    pub fn failed_fund_names(&self) -> Vec<String> {
        self.funds_failed.iter().map(|f| f.fund_name.clone()).collect()
    }
}

/// Run every fund of `source` and hand each batch's transactions to `sink`.
///
/// A failing fund is logged and left out of its batch; the run continues.
/// Listing funds and writing a batch are run-level operations: their errors
/// end the run.
pub async fn run_pipeline(
    source: Arc<dyn FilingSource>,
    cfg: &PipelineConfig,
    sink: &mut dyn BatchSink,
) -> Result<RunReport> {
    let funds = source
        .funds()
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("list funds failed (source={})", source.name()))?;
    let batch_size = cfg.batch_size.max(1);

    info!(source = source.name(), funds = funds.len(), batch_size, "pipeline start");

    let mut report = RunReport {
        funds_total: funds.len(),
        ..RunReport::default()
    };

    for (batch_idx, chunk) in funds.chunks(batch_size).enumerate() {
        let start = batch_idx * batch_size;
        let end = start + batch_size;

        let results = run_batch(&source, cfg, chunk).await?;

        let mut batch: Vec<Transaction> = Vec::new();
        for (fund, res) in chunk.iter().zip(results) {
            match res {
                Ok(run) => {
                    report.funds_succeeded += 1;
                    report.filings_with_issues += run.quality_issues.len();
                    batch.extend(run.transactions);
                }
                Err(e) => {
                    error!(fund = %fund.fund_name, error = %format!("{e:#}"), "fund aborted");
                    report.funds_failed.push(FundFailure {
                        fund_name: fund.fund_name.clone(),
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        if batch.is_empty() {
            info!(start, end, "batch produced no transactions; nothing written");
            continue;
        }

        let written = batch.len();
        if let Some(name) = sink
            .write_batch(start, end, &batch)
            .with_context(|| format!("write batch {start}-{end} failed"))?
        {
            report.batch_files.push(name);
        }
        report.transactions_written += written;
        info!(start, end, transactions = written, "batch written");
    }

    info!(
        funds = report.funds_total,
        failed = report.funds_failed.len(),
        transactions = report.transactions_written,
        "pipeline done"
    );
    Ok(report)
}

/// Run one batch of funds concurrently. Results come back in `funds` order.
async fn run_batch(
    source: &Arc<dyn FilingSource>,
    cfg: &PipelineConfig,
    funds: &[FundRef],
) -> Result<Vec<Result<FundRun>>> {
    let mut set = JoinSet::new();
    for (idx, fund) in funds.iter().enumerate() {
        let source = Arc::clone(source);
        let cfg = cfg.clone();
        let fund = fund.clone();
        set.spawn_blocking(move || (idx, run_fund(source.as_ref(), &fund, &cfg)));
    }

    let mut slots: Vec<Option<Result<FundRun>>> = funds.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (idx, res) = joined.context("fund task panicked")?;
        slots[idx] = Some(res);
    }

    slots
        .into_iter()
        .map(|s| s.ok_or_else(|| anyhow!("fund task did not report a result")))
        .collect()
}
