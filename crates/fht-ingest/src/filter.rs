//! Instrument-class filter.
//!
//! Only common-stock-equivalent positions are diffed. A row is kept when its
//! class contains the configured substring (default `COM`) and it is not an
//! option leg (`PUT` / `CALL`).

use fht_holdings::RawHolding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFilter {
    class_substring: String,
    skip_option_types: Vec<String>,
}

impl Default for ClassFilter {
    fn default() -> Self {
        Self::new("COM", &["PUT", "CALL"])
    }
}

impl ClassFilter {
    pub fn new<S: AsRef<str>>(class_substring: &str, skip_option_types: &[S]) -> Self {
        Self {
            class_substring: class_substring.trim().to_ascii_uppercase(),
            skip_option_types: skip_option_types
                .iter()
                .map(|s| s.as_ref().trim().to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn keeps(&self, row: &RawHolding) -> bool {
        let option_type = row.option_type.trim().to_ascii_uppercase();
        if !option_type.is_empty() && self.skip_option_types.contains(&option_type) {
            return false;
        }
        row.security_class
            .to_ascii_uppercase()
            .contains(&self.class_substring)
    }

    /// Keep matching rows, preserving order.
    pub fn apply(&self, rows: Vec<RawHolding>) -> Vec<RawHolding> {
        rows.into_iter().filter(|r| self.keeps(r)).collect()
    }
}
