//! Direct and inverse rate resolution.

use ratedesk_common::{Currency, CurrencyPair};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{RateError, RateResult};
use crate::store::SharedRateStore;

/// How a resolved rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Base and target are the same currency.
    Identity,
    /// Stored under the requested key.
    Direct,
    /// Derived as `1 / rate` of the reversed key.
    Inverse,
}

/// A rate answering "what is one unit of base worth in target".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRate {
    pub pair: CurrencyPair,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub source: RateSource,
}

/// Resolves rates against a store, direct first, then inverse.
///
/// A direct entry always wins over the inverse of the reversed entry, even when
/// the two are not reciprocal.
#[derive(Clone)]
pub struct RateResolver {
    store: SharedRateStore,
}

impl RateResolver {
    /// Create a resolver over the given store.
    pub fn new(store: SharedRateStore) -> Self {
        Self { store }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &SharedRateStore {
        &self.store
    }

    /// Resolve the rate for an ordered pair.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn resolve(&self, pair: &CurrencyPair) -> RateResult<ResolvedRate> {
        if pair.is_identity() {
            debug!("Identity conversion");
            return Ok(ResolvedRate {
                pair: pair.clone(),
                rate: Decimal::ONE,
                source: RateSource::Identity,
            });
        }

        match self.store.get(pair).await {
            Ok(rate) => {
                return Ok(ResolvedRate {
                    pair: pair.clone(),
                    rate,
                    source: RateSource::Direct,
                })
            }
            Err(RateError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let stored = match self.store.get(&pair.inverse()).await {
            Ok(rate) => rate,
            Err(RateError::NotFound(_)) => return Err(RateError::NotFound(pair.clone())),
            Err(e) => return Err(e),
        };

        // A zero stored rate has no finite inverse.
        let rate = Decimal::ONE
            .checked_div(stored)
            .ok_or_else(|| RateError::NotFound(pair.clone()))?;

        debug!(stored = %stored, rate = %rate, "Derived inverse rate");
        Ok(ResolvedRate {
            pair: pair.clone(),
            rate,
            source: RateSource::Inverse,
        })
    }

    /// Resolve the rate between two currencies.
    pub async fn resolve_for(&self, base: Currency, target: Currency) -> RateResult<ResolvedRate> {
        self.resolve(&CurrencyPair::new(base, target)).await
    }
}
