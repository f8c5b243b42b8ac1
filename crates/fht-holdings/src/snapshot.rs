use std::collections::HashMap;

use crate::types::{Holding, HoldingsError, RawHolding};

/// All positions of one fund at one filing, keyed by security id.
///
/// Iteration follows the order in which ids were first seen in the source
/// rows. A repeated id replaces the earlier holding in place and is recorded
/// in [`Snapshot::duplicates`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    holdings: Vec<Holding>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn get(&self, security_id: &str) -> Option<&Holding> {
        self.index.get(security_id).map(|&i| &self.holdings[i])
    }

    pub fn contains(&self, security_id: &str) -> bool {
        self.index.contains_key(security_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter()
    }

    pub fn security_ids(&self) -> impl Iterator<Item = &str> {
        self.holdings.iter().map(|h| h.security_id.as_str())
    }

    /// Ids that appeared more than once in the source rows, once per
    /// overwrite, in the order the overwrites happened.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    fn insert(&mut self, holding: Holding) {
        match self.index.get(&holding.security_id) {
            Some(&i) => {
                self.duplicates.push(holding.security_id.clone());
                self.holdings[i] = holding;
            }
            None => {
                self.index
                    .insert(holding.security_id.clone(), self.holdings.len());
                self.holdings.push(holding);
            }
        }
    }
}

impl FromIterator<Holding> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Holding>>(iter: I) -> Self {
        let mut snap = Snapshot::empty();
        for h in iter {
            snap.insert(h);
        }
        snap
    }
}

/// Index validated holdings by security id.
pub fn index_holdings<I>(holdings: I) -> Snapshot
where
    I: IntoIterator<Item = Holding>,
{
    holdings.into_iter().collect()
}

/// Validate and index raw rows. The first invalid row aborts indexing.
pub fn index_raw_holdings<I>(rows: I) -> Result<Snapshot, HoldingsError>
where
    I: IntoIterator<Item = RawHolding>,
{
    let mut snap = Snapshot::empty();
    for row in rows {
        snap.insert(Holding::from_raw(row)?);
    }
    Ok(snap)
}
