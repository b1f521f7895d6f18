//! Currency, pair and rate entry types.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CurrencyError, Result};

/// Longest currency code accepted.
pub const MAX_CODE_LEN: usize = 12;

/// Separator between the two codes of a serialized pair.
pub const PAIR_SEPARATOR: char = '-';

/// Currencies offered by the converter UI.
pub const SUPPORTED_CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "CHF", "JPY", "CAD"];

/// Currency code, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a currency from a code, normalising case and surrounding whitespace.
    pub fn new(code: impl AsRef<str>) -> Result<Self> {
        let code = code.as_ref().trim();

        if code.is_empty() {
            return Err(CurrencyError::EmptyCode);
        }

        if code.len() > MAX_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CurrencyError::InvalidCode(code.to_string()));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn gbp() -> Self {
        Self("GBP".to_string())
    }

    pub fn chf() -> Self {
        Self("CHF".to_string())
    }

    pub fn jpy() -> Self {
        Self("JPY".to_string())
    }

    pub fn cad() -> Self {
        Self("CAD".to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

/// An ordered currency pair. `base` is converted into `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    /// Currency being converted from.
    pub base: Currency,
    /// Currency being converted to.
    pub target: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, target: Currency) -> Self {
        Self { base, target }
    }

    /// Build a pair from two raw codes.
    pub fn from_codes(base: &str, target: &str) -> Result<Self> {
        Ok(Self::new(Currency::new(base)?, Currency::new(target)?))
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.target.clone(),
            target: self.base.clone(),
        }
    }

    /// Whether both sides are the same currency.
    pub fn is_identity(&self) -> bool {
        self.base == self.target
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, PAIR_SEPARATOR, self.target)
    }
}

impl FromStr for CurrencyPair {
    type Err = CurrencyError;

    /// Parse `"BASE-TARGET"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(PAIR_SEPARATOR);

        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(target), None) => Self::from_codes(base, target)
                .map_err(|_| CurrencyError::InvalidPair(s.to_string())),
            _ => Err(CurrencyError::InvalidPair(s.to_string())),
        }
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(p: CurrencyPair) -> Self {
        p.to_string()
    }
}

/// Check that a rate is strictly positive.
pub fn validate_rate(rate: Decimal) -> Result<Decimal> {
    if rate <= Decimal::ZERO {
        return Err(CurrencyError::InvalidRate(rate.to_string()));
    }
    Ok(rate)
}

/// Convert a wire rate into a validated decimal.
pub fn rate_from_f64(rate: f64) -> Result<Decimal> {
    if !rate.is_finite() {
        return Err(CurrencyError::InvalidRate(rate.to_string()));
    }

    let rate = Decimal::from_f64(rate).ok_or_else(|| CurrencyError::InvalidRate(rate.to_string()))?;
    validate_rate(rate)
}

/// A stored exchange rate: one unit of `pair.base` is worth `rate` units of
/// `pair.target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRateEntry")]
pub struct RateEntry {
    /// The ordered pair this rate is stored under.
    pub pair: CurrencyPair,
    /// Multiplicative conversion factor.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
}

impl RateEntry {
    /// Create a new entry, rejecting non-positive rates.
    pub fn new(pair: CurrencyPair, rate: Decimal) -> Result<Self> {
        Ok(Self {
            pair,
            rate: validate_rate(rate)?,
        })
    }

    pub fn base(&self) -> &Currency {
        &self.pair.base
    }

    pub fn target(&self) -> &Currency {
        &self.pair.target
    }
}

/// Wire shape of a [`RateEntry`] before its rate is checked.
#[derive(Deserialize)]
struct RawRateEntry {
    pair: CurrencyPair,
    #[serde(with = "rust_decimal::serde::float")]
    rate: Decimal,
}

impl TryFrom<RawRateEntry> for RateEntry {
    type Error = CurrencyError;

    fn try_from(raw: RawRateEntry) -> Result<Self> {
        Self::new(raw.pair, raw.rate)
    }
}

impl fmt::Display for RateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.pair, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_normalisation() {
        let c = Currency::new(" usd ").unwrap();
        assert_eq!(c.code(), "USD");
        assert_eq!(c, Currency::usd());
    }

    #[test]
    fn test_currency_rejects_bad_codes() {
        assert_eq!(Currency::new(""), Err(CurrencyError::EmptyCode));
        assert_eq!(Currency::new("   "), Err(CurrencyError::EmptyCode));
        assert!(matches!(Currency::new("US D"), Err(CurrencyError::InvalidCode(_))));
        assert!(matches!(Currency::new("US-D"), Err(CurrencyError::InvalidCode(_))));
        assert!(matches!(
            Currency::new("ABCDEFGHIJKLM"),
            Err(CurrencyError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_pair_parse_and_display() {
        let pair: CurrencyPair = "usd-eur".parse().unwrap();
        assert_eq!(pair.base, Currency::usd());
        assert_eq!(pair.target, Currency::eur());
        assert_eq!(pair.to_string(), "USD-EUR");
        assert_eq!(pair.inverse().to_string(), "EUR-USD");
    }

    #[test]
    fn test_pair_parse_rejects_malformed() {
        for bad in ["USD", "USD-", "-EUR", "USD-EUR-GBP", "", "USD/EUR"] {
            assert!(
                matches!(bad.parse::<CurrencyPair>(), Err(CurrencyError::InvalidPair(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_identity_pair() {
        let pair = CurrencyPair::new(Currency::gbp(), Currency::gbp());
        assert!(pair.is_identity());
        assert!(!CurrencyPair::new(Currency::gbp(), Currency::usd()).is_identity());
    }

    #[test]
    fn test_rate_validation() {
        assert_eq!(validate_rate(dec!(0.84)), Ok(dec!(0.84)));
        assert!(validate_rate(Decimal::ZERO).is_err());
        assert!(validate_rate(dec!(-1.5)).is_err());

        assert_eq!(rate_from_f64(1.19).unwrap(), dec!(1.19));
        assert!(rate_from_f64(f64::NAN).is_err());
        assert!(rate_from_f64(f64::INFINITY).is_err());
        assert!(rate_from_f64(0.0).is_err());
    }

    #[test]
    fn test_rate_entry_serialization() {
        let entry = RateEntry::new(CurrencyPair::new(Currency::usd(), Currency::eur()), dec!(0.84))
            .unwrap();

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "pair": "USD-EUR", "rate": 0.84 }));

        let back: RateEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_rate_entry_rejects_non_positive() {
        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());
        assert!(RateEntry::new(pair.clone(), Decimal::ZERO).is_err());
        assert!(RateEntry::new(pair, dec!(-0.84)).is_err());
    }

    #[test]
    fn test_rate_entry_deserialization_validates_rate() {
        for body in [
            serde_json::json!({ "pair": "USD-EUR", "rate": 0 }),
            serde_json::json!({ "pair": "USD-EUR", "rate": -0.84 }),
        ] {
            assert!(serde_json::from_value::<RateEntry>(body).is_err());
        }

        let entry: RateEntry =
            serde_json::from_value(serde_json::json!({ "pair": "eur-gbp", "rate": 0.8731 })).unwrap();
        assert_eq!(entry.pair.to_string(), "EUR-GBP");
        assert_eq!(entry.rate, dec!(0.8731));
    }
}
