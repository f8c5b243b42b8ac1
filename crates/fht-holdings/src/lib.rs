//! fht-holdings
//!
//! Holdings-diff engine.
//!
//! Takes two consecutive snapshots of one fund's disclosed positions and infers
//! the transactions (BUY / SELL / HOLD) that explain the change between them.
//!
//! - Holdings are validated at construction (missing CUSIP or bad share count fail fast)
//! - Snapshots are keyed by security id, last duplicate wins, duplicates are recorded
//! - Disappearances are emitted before presences
//!
//! Deterministic, pure logic. No IO. No logging.

mod builder;
mod engine;
mod normalizer;
mod snapshot;
pub mod summary;
mod types;

pub use builder::{build_transaction, BuildArgs};
pub use engine::{diff_holdings, diff_snapshots};
pub use normalizer::{parse_grouped_integer, parse_share_count};
pub use snapshot::{index_holdings, index_raw_holdings, Snapshot};
pub use types::*;
