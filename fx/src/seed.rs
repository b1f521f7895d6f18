//! Initial rate table.

use ratedesk_common::{Currency, CurrencyPair, RateEntry};
use rust_decimal::Decimal;

/// Rates written into an empty store on first start.
pub fn default_rates() -> Vec<RateEntry> {
    [
        (Currency::usd(), Currency::eur(), Decimal::new(84, 2)),
        (Currency::eur(), Currency::usd(), Decimal::new(119, 2)),
        (Currency::eur(), Currency::gbp(), Decimal::new(8731, 4)),
        (Currency::usd(), Currency::jpy(), Decimal::new(767200, 4)),
        (Currency::chf(), Currency::usd(), Decimal::new(11379, 4)),
        (Currency::gbp(), Currency::cad(), Decimal::new(15648, 4)),
    ]
    .into_iter()
    .map(|(base, target, rate)| RateEntry {
        pair: CurrencyPair::new(base, target),
        rate,
    })
    .collect()
}
