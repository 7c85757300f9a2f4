//! Estimated registration prices per TLD.
//!
//! Prices are first-year estimates in USD from a built-in table. The table
//! is built once and shared immutably; config files may layer overrides on
//! top when the table is constructed. Unknown suffixes get a placeholder.

use crate::input::extract_tld;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Price used for any suffix missing from the table.
pub const DEFAULT_PRICE: Decimal = Decimal::from_parts(1999, 0, 0, false, 2);

lazy_static::lazy_static! {
    static ref BUILTIN_PRICES: HashMap<&'static str, Decimal> = {
        // (tld, price in cents)
        let table: &[(&str, i64)] = &[
            // Generic
            ("com", 1299),
            ("net", 1499),
            ("org", 1299),
            ("info", 499),
            ("biz", 1499),
            ("xyz", 299),
            ("online", 3499),
            ("site", 2999),
            ("website", 2499),
            ("store", 4999),
            ("shop", 3499),
            ("blog", 2499),
            ("tech", 4999),
            ("cloud", 2499),
            ("digital", 3499),
            ("zone", 2999),
            // Google registry
            ("app", 1799),
            ("dev", 1599),
            ("page", 1199),
            // Country codes
            ("io", 3999),
            ("ai", 7999),
            ("co", 2999),
            ("me", 1999),
            ("tv", 3499),
            ("cc", 1299),
            ("us", 999),
            ("uk", 899),
            ("de", 999),
            ("fr", 1199),
            ("nl", 999),
            ("eu", 899),
            ("ca", 1499),
            ("au", 1499),
            ("in", 999),
            ("br", 1299),
            ("es", 999),
        ];
        table
            .iter()
            .map(|(tld, cents)| (*tld, Decimal::new(*cents, 2)))
            .collect()
    };
}

/// Immutable TLD -> price lookup.
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: HashMap<String, Decimal>,
    default_price: Decimal,
}

impl PriceTable {
    /// The built-in price table.
    pub fn builtin() -> Self {
        Self {
            prices: BUILTIN_PRICES
                .iter()
                .map(|(tld, price)| (tld.to_string(), *price))
                .collect(),
            default_price: DEFAULT_PRICE,
        }
    }

    /// The built-in table with per-TLD overrides applied.
    ///
    /// Override keys are matched case-insensitively and may carry a leading dot.
    pub fn with_overrides(overrides: &HashMap<String, Decimal>) -> Self {
        let mut table = Self::builtin();
        for (tld, price) in overrides {
            let key = tld.trim().trim_start_matches('.').to_lowercase();
            if !key.is_empty() {
                table.prices.insert(key, *price);
            }
        }
        table
    }

    /// Replace the placeholder price for unknown suffixes.
    pub fn with_default_price(mut self, price: Decimal) -> Self {
        self.default_price = price;
        self
    }

    /// Price for a bare TLD ("com", ".io"), falling back to the default.
    pub fn price_for_tld(&self, tld: &str) -> Decimal {
        let key = tld.trim_start_matches('.').to_lowercase();
        self.prices
            .get(&key)
            .copied()
            .unwrap_or(self.default_price)
    }

    /// Estimated price for a full domain name, based on its last label.
    pub fn estimate(&self, domain: &str) -> Decimal {
        match extract_tld(domain) {
            Some(tld) => self.price_for_tld(&tld),
            None => self.default_price,
        }
    }

    /// Whether the TLD has an explicit entry.
    pub fn contains(&self, tld: &str) -> bool {
        self.prices
            .contains_key(&tld.trim_start_matches('.').to_lowercase())
    }

    /// All TLDs with explicit prices, sorted.
    pub fn known_tlds(&self) -> Vec<String> {
        let mut tlds: Vec<String> = self.prices.keys().cloned().collect();
        tlds.sort();
        tlds
    }

    pub fn default_price(&self) -> Decimal {
        self.default_price
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::builtin()
    }
}
