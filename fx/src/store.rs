//! Rate store trait.

use async_trait::async_trait;
use ratedesk_common::{CurrencyPair, RateEntry};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::error::RateResult;

/// Keyed storage of exchange rates by ordered currency pair.
///
/// Lookups are exact: `get` never inverts a pair, that is the resolver's job.
/// Writes to the same key are serialized by the implementation, last write wins.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Get the store name, used in logs.
    fn name(&self) -> &str;

    /// Exact lookup of the forward key.
    async fn get(&self, pair: &CurrencyPair) -> RateResult<Decimal>;

    /// Insert or silently overwrite the rate for `pair`.
    async fn put(&self, pair: CurrencyPair, rate: Decimal) -> RateResult<RateEntry>;

    /// Overwrite the rate of an existing entry. Never creates one.
    async fn update(&self, pair: CurrencyPair, rate: Decimal) -> RateResult<RateEntry>;

    /// Delete the entry for `pair`.
    async fn remove(&self, pair: &CurrencyPair) -> RateResult<()>;

    /// All entries in insertion order.
    async fn list(&self) -> RateResult<Vec<RateEntry>>;

    /// Number of stored entries.
    async fn len(&self) -> RateResult<usize> {
        Ok(self.list().await?.len())
    }
}

/// Shared rate store handle.
pub type SharedRateStore = Arc<dyn RateStore>;

/// Insert `entries` only when the store holds nothing yet.
///
/// Returns the number of entries written.
pub async fn seed_if_empty(store: &dyn RateStore, entries: &[RateEntry]) -> RateResult<usize> {
    let existing = store.len().await?;
    if existing > 0 {
        info!(store = store.name(), existing, "Rates already present, skipping seed");
        return Ok(0);
    }

    for entry in entries {
        store.put(entry.pair.clone(), entry.rate).await?;
    }

    info!(store = store.name(), seeded = entries.len(), "Seeded initial rates");
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRateStore;
    use crate::seed::default_rates;
    use ratedesk_common::Currency;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_seed_into_empty_store() {
        let store = InMemoryRateStore::new();
        let defaults = default_rates();

        let written = seed_if_empty(&store, &defaults).await.unwrap();

        assert_eq!(written, defaults.len());
        assert_eq!(store.list().await.unwrap(), defaults);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let store = InMemoryRateStore::new();
        store
            .put(CurrencyPair::new(Currency::usd(), Currency::cad()), dec!(1.25))
            .await
            .unwrap();

        let written = seed_if_empty(&store, &default_rates()).await.unwrap();

        assert_eq!(written, 0);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
