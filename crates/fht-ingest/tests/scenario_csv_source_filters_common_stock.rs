//! CSV-backed filing source end to end: file on disk -> funds -> filings ->
//! holdings rows -> common-stock filter -> quality report.

use fht_ingest::{build_filing_quality_report, ClassFilter, CsvFilingSource, FilingSource};

const CSV: &str = "\
manager_name,quarter,date_filed,Sym,Cl,CUSIP,Value ($000),Shares,Option Type
ACME CAPITAL,Q2 2024,2024-08-14,AAPL,COM,037833100,\"2,100\",\"10,000\",
ACME CAPITAL,Q2 2024,2024-08-14,AAPL,COM,037833100,\"1,050\",\"5,000\",Put
ACME CAPITAL,Q2 2024,2024-08-14,TSLA,NOTE 2.000% 5/1,88160RAG6,900,\"1,000\",
ACME CAPITAL,Q1 2024,2024-05-15,AAPL,COM,037833100,\"1,700\",\"8,000\",
ACME CAPITAL,Q1 2024,2024-05-15,MSFT,CL A COM,594918104,400,\"1,000\",
ZETA PARTNERS,Q1 2024,2024-05-10,NVDA,COM,67066G104,800,900,
ZETA PARTNERS,Q1 2024,2024-05-10,NVDA,COM,67066G104,800,900,
";

#[test]
fn csv_source_groups_and_filters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("holdings.csv");
    std::fs::write(&path, CSV).unwrap();

    let src = CsvFilingSource::from_path(&path).unwrap();
    assert_eq!(src.name(), "csv");

    let funds = src.funds().unwrap();
    assert_eq!(funds.len(), 2);
    assert_eq!(funds[0].fund_name, "ACME CAPITAL");

    let filings = src.filings(&funds[0]).unwrap();
    assert_eq!(filings.len(), 2);
    assert_eq!(filings[0].quarter, "Q2 2024", "source order is first-seen order");

    let filter = ClassFilter::default();
    let q2 = filter.apply(src.holdings(&filings[0]).unwrap());
    assert_eq!(q2.len(), 1, "put leg and note must be filtered out");
    assert_eq!(q2[0].symbol, "AAPL");
    assert_eq!(q2[0].shares, "10,000");

    let q1 = filter.apply(src.holdings(&filings[1]).unwrap());
    let syms: Vec<&str> = q1.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(syms, vec!["AAPL", "MSFT"]);
}

#[test]
fn duplicate_disclosures_show_up_in_quality_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("holdings.csv");
    std::fs::write(&path, CSV).unwrap();

    let src = CsvFilingSource::from_path(&path).unwrap();
    let funds = src.funds().unwrap();
    let zeta_filing = src.filings(&funds[1]).unwrap().remove(0);
    let rows = src.holdings(&zeta_filing).unwrap();

    let report = build_filing_quality_report(&zeta_filing, &rows);
    assert_eq!(report.rows, 2);
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].security_id, "67066G104");
    assert_eq!(report.duplicates[0].count, 2);
}

#[test]
fn missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CsvFilingSource::from_path(&dir.path().join("absent.csv")).is_err());
}
