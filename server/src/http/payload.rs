//! Request payloads and their normalisation into core types.
//!
//! Clients name a pair either as `{"pair": "USD-EUR"}` or as
//! `{"base": "USD", "target": "EUR"}`. Both collapse into one [`CurrencyPair`]
//! here so the store and resolver never see the difference.

use std::collections::HashMap;

use ratedesk_common::{rate_from_f64, CurrencyPair};
use ratedesk_fx::{RateError, RateResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Either form of pair reference.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PairSelector {
    pub pair: Option<String>,
    pub base: Option<String>,
    pub target: Option<String>,
}

impl PairSelector {
    /// Read a selector from query parameters.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            pair: query.get("pair").cloned(),
            base: query.get("base").cloned(),
            target: query.get("target").cloned(),
        }
    }

    /// Whether no part of a pair was given.
    pub fn is_empty(&self) -> bool {
        present(&self.pair).is_none() && present(&self.base).is_none() && present(&self.target).is_none()
    }

    /// Resolve to a pair. An explicit `pair` takes precedence over `base`/`target`.
    pub fn into_pair(self) -> RateResult<CurrencyPair> {
        if let Some(pair) = present(&self.pair) {
            return Ok(pair.parse::<CurrencyPair>()?);
        }

        match (present(&self.base), present(&self.target)) {
            (Some(base), Some(target)) => Ok(CurrencyPair::from_codes(base, target)?),
            _ => Err(RateError::InvalidInput(
                "Missing or invalid 'base' or 'target' parameters".to_string(),
            )),
        }
    }
}

/// Body of add and update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RatePayload {
    pub pair: Option<String>,
    pub base: Option<String>,
    pub target: Option<String>,
    pub rate: Option<f64>,
}

impl RatePayload {
    /// Normalise into `(pair, rate)`.
    pub fn normalize(self) -> RateResult<(CurrencyPair, Decimal)> {
        let pair = PairSelector {
            pair: self.pair,
            base: self.base,
            target: self.target,
        }
        .into_pair()?;

        let rate = self
            .rate
            .ok_or_else(|| RateError::InvalidInput("Missing or invalid 'rate'".to_string()))?;

        Ok((pair, rate_from_f64(rate)?))
    }
}

/// Body of amount conversion requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertPayload {
    pub base: Option<String>,
    pub target: Option<String>,
    #[serde(default)]
    pub amount: Value,
}

impl ConvertPayload {
    pub fn pair(&self) -> RateResult<CurrencyPair> {
        PairSelector {
            pair: None,
            base: self.base.clone(),
            target: self.target.clone(),
        }
        .into_pair()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
