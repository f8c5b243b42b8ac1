//! fht-ingest
//!
//! Boundary between the filing collaborators (scraper, HTML table parser,
//! CSV exports) and the diff engine.
//!
//! This crate owns:
//! - the holdings CSV reader (`ingest_csv`)
//! - the common-stock instrument filter (`filter`)
//! - the filing-source trait and a CSV-backed source (`source`)
//! - per-filing data-quality reports (`quality`)
//!
//! It does **not** diff, sort filings, or write output.

pub mod filter;
pub mod ingest_csv;
pub mod quality;
pub mod source;

pub use filter::ClassFilter;
pub use ingest_csv::{parse_holdings_csv_file, parse_holdings_csv_str, CsvIngestError};
pub use quality::{build_filing_quality_report, FilingQualityReport};
pub use source::{CsvFilingSource, FilingRef, FilingSource, FundRef, SourceError};
