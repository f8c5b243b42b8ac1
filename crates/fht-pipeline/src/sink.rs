use std::path::{Path, PathBuf};

use anyhow::Result;
use fht_artifacts::{batch_file_name, write_transactions_file};
use fht_holdings::Transaction;

/// Receiver of finished batches. Called once per non-empty batch, from the
/// pipeline task only.
pub trait BatchSink {
    /// Persist one batch covering funds `start..end`. Returns a name for the
    /// written artifact, if any.
    fn write_batch(&mut self, start: usize, end: usize, txns: &[Transaction]) -> Result<Option<String>>;
}

/// Writes `transactions_batch_{start}-{end}.csv` into one directory.
#[derive(Debug, Clone)]
pub struct CsvBatchSink {
    dir: PathBuf,
}

impl CsvBatchSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BatchSink for CsvBatchSink {
    fn write_batch(&mut self, start: usize, end: usize, txns: &[Transaction]) -> Result<Option<String>> {
        let name = batch_file_name(start, end);
        write_transactions_file(&self.dir.join(&name), txns)?;
        Ok(Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fht_artifacts::read_transactions_csv;
    use fht_holdings::TransactionType;

    #[test]
    fn batch_lands_in_sink_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvBatchSink::new(dir.path().join("out"));
        let txn = Transaction {
            fund_name: "ACME".to_string(),
            filing_date: "2024-05-15".to_string(),
            quarter: "Q1 2024".to_string(),
            security_id: "037833100".to_string(),
            symbol: "AAPL".to_string(),
            security_class: "COM".to_string(),
            reported_value: "100".to_string(),
            shares_text: "10".to_string(),
            shares: 10,
            share_delta: 10,
            pct_change: None,
            transaction_type: TransactionType::Buy,
        };

        let name = sink.write_batch(0, 5, &[txn]).unwrap();
        assert_eq!(name.as_deref(), Some("transactions_batch_0-5.csv"));

        let written = sink.dir().join("transactions_batch_0-5.csv");
        assert_eq!(read_transactions_csv(&written).unwrap().len(), 1);
    }
}
