//! Amount conversion using a resolved rate.

use ratedesk_common::CurrencyPair;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{RateError, RateResult};
use crate::resolver::RateResolver;

/// Read a user-entered amount. Anything that is not a finite number is zero.
pub fn sanitize_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .and_then(Decimal::from_f64)
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_amount(s),
        _ => Decimal::ZERO,
    }
}

fn parse_amount(s: &str) -> Decimal {
    let s = s.trim();
    if let Ok(d) = Decimal::from_str(s) {
        return d;
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}

/// Result of converting an amount of `pair.base` into `pair.target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub pair: CurrencyPair,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub converted_amount: Decimal,
}

impl Quote {
    /// Compute `amount * rate`.
    pub fn new(pair: CurrencyPair, amount: Decimal, rate: Decimal) -> RateResult<Self> {
        let converted_amount = amount
            .checked_mul(rate)
            .ok_or_else(|| RateError::InvalidInput(format!("amount {} out of range", amount)))?;

        Ok(Self {
            pair,
            amount,
            rate,
            converted_amount,
        })
    }

    /// The quote as seen after swapping the two currencies: amounts trade
    /// places and the rate is inverted locally, without consulting a store.
    ///
    /// Returns `None` when the rate is zero.
    pub fn swapped(&self) -> Option<Self> {
        let rate = Decimal::ONE.checked_div(self.rate)?;

        Some(Self {
            pair: self.pair.inverse(),
            amount: self.converted_amount,
            rate,
            converted_amount: self.amount,
        })
    }
}

/// Resolve the rate for `pair` and convert `amount` with it.
pub async fn convert(
    resolver: &RateResolver,
    pair: &CurrencyPair,
    amount: Decimal,
) -> RateResult<Quote> {
    let resolved = resolver.resolve(pair).await?;
    Quote::new(resolved.pair, amount, resolved.rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRateStore;
    use crate::seed::default_rates;
    use ratedesk_common::Currency;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn usd_eur() -> CurrencyPair {
        CurrencyPair::new(Currency::usd(), Currency::eur())
    }

    #[test]
    fn test_sanitize_amount() {
        assert_eq!(sanitize_amount(&json!(1)), dec!(1));
        assert_eq!(sanitize_amount(&json!(2.5)), dec!(2.5));
        assert_eq!(sanitize_amount(&json!("12.75")), dec!(12.75));
        assert_eq!(sanitize_amount(&json!(" 3 ")), dec!(3));
        assert_eq!(sanitize_amount(&json!("1e3")), dec!(1000));
        assert_eq!(sanitize_amount(&json!("")), Decimal::ZERO);
        assert_eq!(sanitize_amount(&json!("abc")), Decimal::ZERO);
        assert_eq!(sanitize_amount(&json!("NaN")), Decimal::ZERO);
        assert_eq!(sanitize_amount(&json!("inf")), Decimal::ZERO);
        assert_eq!(sanitize_amount(&json!(null)), Decimal::ZERO);
        assert_eq!(sanitize_amount(&json!(true)), Decimal::ZERO);
        assert_eq!(sanitize_amount(&json!([1])), Decimal::ZERO);
    }

    #[test]
    fn test_quote_multiplies() {
        let quote = Quote::new(usd_eur(), dec!(1), dec!(0.84)).unwrap();
        assert_eq!(quote.converted_amount, dec!(0.84));

        let quote = Quote::new(usd_eur(), sanitize_amount(&json!("")), dec!(0.84)).unwrap();
        assert_eq!(quote.converted_amount, Decimal::ZERO);
    }

    #[test]
    fn test_quote_overflow_is_invalid_input() {
        let result = Quote::new(usd_eur(), Decimal::MAX, dec!(2));
        assert!(matches!(result, Err(RateError::InvalidInput(_))));
    }

    #[test]
    fn test_quote_serialization() {
        let quote = Quote::new(usd_eur(), dec!(100), dec!(0.84)).unwrap();
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(
            json,
            json!({ "pair": "USD-EUR", "amount": 100.0, "rate": 0.84, "convertedAmount": 84.0 })
        );
    }

    #[test]
    fn test_swapped_quote() {
        let quote = Quote::new(usd_eur(), dec!(100), dec!(0.84)).unwrap();

        let swapped = quote.swapped().unwrap();

        assert_eq!(swapped.pair.to_string(), "EUR-USD");
        assert_eq!(swapped.amount, dec!(84));
        assert_eq!(swapped.converted_amount, dec!(100));
        assert_eq!(swapped.rate, Decimal::ONE / dec!(0.84));
    }

    #[test]
    fn test_swapped_zero_rate() {
        let quote = Quote::new(usd_eur(), dec!(100), Decimal::ZERO).unwrap();
        assert!(quote.swapped().is_none());
    }

    #[tokio::test]
    async fn test_convert_through_resolver() {
        let resolver = RateResolver::new(Arc::new(InMemoryRateStore::with_entries(
            default_rates(),
        )));

        let quote = convert(&resolver, &CurrencyPair::new(Currency::usd(), Currency::jpy()), dec!(10))
            .await
            .unwrap();
        assert_eq!(quote.converted_amount, dec!(767.20));

        let missing = convert(&resolver, &CurrencyPair::new(Currency::jpy(), Currency::chf()), dec!(10)).await;
        assert!(matches!(missing, Err(RateError::NotFound(_))));
    }
}
