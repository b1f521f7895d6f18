//! In-memory rate store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ratedesk_common::{validate_rate, CurrencyPair, RateEntry};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::error::{RateError, RateResult};
use crate::store::RateStore;

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Insertion sequence, fixed on first insert.
    seq: u64,
    rate: Decimal,
}

/// Process-local rate table.
///
/// Each key is guarded by its shard lock, so concurrent writers to the same pair
/// never interleave. Contents do not survive a restart.
pub struct InMemoryRateStore {
    rates: DashMap<CurrencyPair, Slot>,
    next_seq: AtomicU64,
}

impl InMemoryRateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rates: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Create a store holding `entries`, in order. Entries with a
    /// non-positive rate are skipped.
    pub fn with_entries(entries: impl IntoIterator<Item = RateEntry>) -> Self {
        let store = Self::new();
        for entry in entries {
            match validate_rate(entry.rate) {
                Ok(_) => store.insert(entry),
                Err(e) => warn!(pair = %entry.pair, error = %e, "Skipping invalid rate entry"),
            }
        }
        store
    }

    fn insert(&self, entry: RateEntry) {
        match self.rates.entry(entry.pair) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().rate = entry.rate;
            }
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Slot {
                    seq,
                    rate: entry.rate,
                });
            }
        }
    }
}

impl Default for InMemoryRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, pair: &CurrencyPair) -> RateResult<Decimal> {
        match self.rates.get(pair) {
            Some(slot) => {
                debug!(pair = %pair, rate = %slot.rate, "Store hit");
                Ok(slot.rate)
            }
            None => {
                debug!(pair = %pair, "Store miss");
                Err(RateError::NotFound(pair.clone()))
            }
        }
    }

    async fn put(&self, pair: CurrencyPair, rate: Decimal) -> RateResult<RateEntry> {
        let entry = RateEntry::new(pair, rate)?;
        self.insert(entry.clone());

        info!(pair = %entry.pair, rate = %entry.rate, "Stored rate");
        Ok(entry)
    }

    async fn update(&self, pair: CurrencyPair, rate: Decimal) -> RateResult<RateEntry> {
        let entry = RateEntry::new(pair, rate)?;

        match self.rates.get_mut(&entry.pair) {
            Some(mut slot) => {
                slot.rate = entry.rate;
            }
            None => return Err(RateError::NotFound(entry.pair)),
        }

        info!(pair = %entry.pair, rate = %entry.rate, "Updated rate");
        Ok(entry)
    }

    async fn remove(&self, pair: &CurrencyPair) -> RateResult<()> {
        match self.rates.remove(pair) {
            Some(_) => {
                info!(pair = %pair, "Removed rate");
                Ok(())
            }
            None => Err(RateError::NotFound(pair.clone())),
        }
    }

    async fn list(&self) -> RateResult<Vec<RateEntry>> {
        let mut slots: Vec<(u64, RateEntry)> = self
            .rates
            .iter()
            .map(|e| {
                (
                    e.value().seq,
                    RateEntry {
                        pair: e.key().clone(),
                        rate: e.value().rate,
                    },
                )
            })
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);

        Ok(slots.into_iter().map(|(_, entry)| entry).collect())
    }

    async fn len(&self) -> RateResult<usize> {
        Ok(self.rates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratedesk_common::Currency;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn pair(base: &str, target: &str) -> CurrencyPair {
        CurrencyPair::from_codes(base, target).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryRateStore::new();

        let entry = store.put(pair("USD", "EUR"), dec!(0.84)).await.unwrap();

        assert_eq!(entry.rate, dec!(0.84));
        assert_eq!(store.get(&pair("USD", "EUR")).await.unwrap(), dec!(0.84));
    }

    #[tokio::test]
    async fn test_with_entries_skips_non_positive_rates() {
        let store = InMemoryRateStore::with_entries(vec![
            RateEntry {
                pair: pair("USD", "EUR"),
                rate: Decimal::ZERO,
            },
            RateEntry {
                pair: pair("EUR", "GBP"),
                rate: dec!(-0.87),
            },
            RateEntry::new(pair("USD", "JPY"), dec!(76.72)).unwrap(),
        ]);

        assert_eq!(store.len().await.unwrap(), 1);
        assert!(matches!(
            store.get(&pair("USD", "EUR")).await,
            Err(RateError::NotFound(_))
        ));
        assert_eq!(store.get(&pair("USD", "JPY")).await.unwrap(), dec!(76.72));
    }

    #[tokio::test]
    async fn test_get_is_exact() {
        let store = InMemoryRateStore::new();
        store.put(pair("USD", "EUR"), dec!(0.84)).await.unwrap();

        let result = store.get(&pair("EUR", "USD")).await;

        assert_eq!(result, Err(RateError::NotFound(pair("EUR", "USD"))));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryRateStore::new();
        store.put(pair("USD", "EUR"), dec!(0.84)).await.unwrap();
        store.put(pair("USD", "EUR"), dec!(0.91)).await.unwrap();

        assert_eq!(store.get(&pair("USD", "EUR")).await.unwrap(), dec!(0.91));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_rejects_invalid_rate_without_mutation() {
        let store = InMemoryRateStore::new();
        store.put(pair("USD", "EUR"), dec!(0.84)).await.unwrap();

        let zero = store.put(pair("USD", "EUR"), Decimal::ZERO).await;
        let negative = store.put(pair("GBP", "USD"), dec!(-1)).await;

        assert!(matches!(zero, Err(RateError::InvalidInput(_))));
        assert!(matches!(negative, Err(RateError::InvalidInput(_))));
        assert_eq!(store.get(&pair("USD", "EUR")).await.unwrap(), dec!(0.84));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_requires_existing_key() {
        let store = InMemoryRateStore::new();

        let result = store.update(pair("USD", "EUR"), dec!(0.9)).await;
        assert_eq!(result, Err(RateError::NotFound(pair("USD", "EUR"))));
        assert_eq!(store.len().await.unwrap(), 0);

        store.put(pair("USD", "EUR"), dec!(0.84)).await.unwrap();
        store.update(pair("USD", "EUR"), dec!(0.9)).await.unwrap();
        assert_eq!(store.get(&pair("USD", "EUR")).await.unwrap(), dec!(0.9));
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let store = InMemoryRateStore::new();
        store.put(pair("USD", "EUR"), dec!(0.84)).await.unwrap();

        assert!(store.remove(&pair("USD", "EUR")).await.is_ok());
        assert_eq!(
            store.remove(&pair("USD", "EUR")).await,
            Err(RateError::NotFound(pair("USD", "EUR")))
        );
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryRateStore::new();
        store.put(pair("USD", "JPY"), dec!(76.72)).await.unwrap();
        store.put(pair("EUR", "GBP"), dec!(0.8731)).await.unwrap();
        store.put(pair("CHF", "USD"), dec!(1.1379)).await.unwrap();
        // Overwrite keeps the original slot
        store.put(pair("USD", "JPY"), dec!(77)).await.unwrap();

        let pairs: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|e| e.pair.to_string())
            .collect();

        assert_eq!(pairs, vec!["USD-JPY", "EUR-GBP", "CHF-USD"]);
    }

    #[tokio::test]
    async fn test_concurrent_writers_same_key() {
        let store = Arc::new(InMemoryRateStore::new());
        let mut handles = Vec::new();

        for i in 1..=32u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .put(
                        CurrencyPair::new(Currency::usd(), Currency::eur()),
                        Decimal::from(i),
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let rate = store.get(&pair("USD", "EUR")).await.unwrap();
        assert!(rate >= Decimal::ONE && rate <= Decimal::from(32));
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
