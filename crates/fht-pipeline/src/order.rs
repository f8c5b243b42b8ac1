use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use fht_config::FilingOrder;
use fht_ingest::FilingRef;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

pub fn parse_filing_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| anyhow!("unrecognized filing date '{}'", s))
}

/// Put a fund's filings oldest first. Sorting by date is stable, so filings
/// sharing a date (amendments) keep their source order.
pub fn order_filings(mut filings: Vec<FilingRef>, order: FilingOrder) -> Result<Vec<FilingRef>> {
    match order {
        FilingOrder::OldestFirst => {}
        FilingOrder::NewestFirst => filings.reverse(),
        FilingOrder::ByFilingDate => {
            let mut keyed = filings
                .into_iter()
                .map(|f| Ok((parse_filing_date(&f.filing_date)?, f)))
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by_key(|(d, _)| *d);
            filings = keyed.into_iter().map(|(_, f)| f).collect();
        }
    }
    Ok(filings)
}
