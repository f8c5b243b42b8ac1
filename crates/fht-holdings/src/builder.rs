use crate::types::{FilingContext, Holding, Transaction, TransactionType};

/// Inputs for [`build_transaction`].
pub struct BuildArgs<'a> {
    /// Holding the descriptive fields are copied from.
    pub holding: &'a Holding,
    pub share_delta: i64,
    pub pct_change: Option<f64>,
    pub transaction_type: TransactionType,
    /// Filing the transaction is reported under.
    pub filing: &'a FilingContext,
}

/// Assemble a transaction. Descriptive fields are copied verbatim from the
/// holding; quarter and filing date come from `filing`.
pub fn build_transaction(args: BuildArgs<'_>) -> Transaction {
    let h = args.holding;
    Transaction {
        fund_name: h.fund_name.clone(),
        filing_date: args.filing.filing_date.clone(),
        quarter: args.filing.quarter.clone(),
        security_id: h.security_id.clone(),
        symbol: h.symbol.clone(),
        security_class: h.security_class.clone(),
        reported_value: h.reported_value.clone(),
        shares_text: h.shares_text.clone(),
        shares: h.share_count,
        share_delta: args.share_delta,
        pct_change: args.pct_change,
        transaction_type: args.transaction_type,
    }
}
