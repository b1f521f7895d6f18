//! Request handlers.

use std::collections::HashMap;

use ratedesk_common::{Currency, SUPPORTED_CURRENCIES};
use ratedesk_fx::{convert, sanitize_amount, RateError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Rejection, Reply};

use crate::http::payload::{ConvertPayload, PairSelector, RatePayload};
use crate::http::problem::reject;
use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct RateReply {
    #[serde(with = "rust_decimal::serde::float")]
    rate: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionReply {
    base: Currency,
    target: Currency,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    converted_amount: Decimal,
}

/// `GET /api/convert`: the full table without parameters, one resolved rate
/// with `base` and `target`.
pub async fn get_rates(
    query: HashMap<String, String>,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let selector = PairSelector::from_query(&query);

    if selector.is_empty() {
        let entries = state.store.list().await.map_err(reject)?;
        return Ok(warp::reply::json(&entries));
    }

    let pair = selector.into_pair().map_err(reject)?;
    state.metrics.lookup();

    match state.resolver.resolve(&pair).await {
        Ok(resolved) => Ok(warp::reply::json(&RateReply {
            rate: resolved.rate,
        })),
        Err(e) => {
            if matches!(e, RateError::NotFound(_)) {
                state.metrics.lookup_not_found();
            }
            Err(reject(e))
        }
    }
}

/// `POST /api/convert`: insert or overwrite a rate.
pub async fn add_rate(body: RatePayload, state: AppState) -> Result<impl Reply, Rejection> {
    let (pair, rate) = body.normalize().map_err(reject)?;
    let entry = state.store.put(pair, rate).await.map_err(reject)?;

    state.metrics.mutation();
    info!(pair = %entry.pair, rate = %entry.rate, "Rate added via dashboard");

    Ok(warp::reply::with_status(
        warp::reply::json(&entry),
        StatusCode::CREATED,
    ))
}

/// `PUT /api/convert`: change the rate of an existing pair.
pub async fn update_rate(body: RatePayload, state: AppState) -> Result<impl Reply, Rejection> {
    let (pair, rate) = body.normalize().map_err(reject)?;
    let entry = state.store.update(pair, rate).await.map_err(reject)?;

    state.metrics.mutation();
    info!(pair = %entry.pair, rate = %entry.rate, "Rate updated via dashboard");

    Ok(warp::reply::json(&entry))
}

/// `DELETE /api/convert`: the pair comes from a JSON body when one is sent,
/// otherwise from the query string.
pub async fn delete_rate(
    query: HashMap<String, String>,
    body: Bytes,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let selector = if body.iter().all(u8::is_ascii_whitespace) {
        PairSelector::from_query(&query)
    } else {
        serde_json::from_slice::<PairSelector>(&body)
            .map_err(|e| reject(RateError::InvalidInput(format!("Invalid body: {}", e))))?
    };

    let pair = selector.into_pair().map_err(reject)?;
    state.store.remove(&pair).await.map_err(reject)?;

    state.metrics.mutation();
    info!(pair = %pair, "Rate deleted via dashboard");

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/currency/convert`: convert an amount. Unusable amounts count as zero.
pub async fn convert_amount(body: ConvertPayload, state: AppState) -> Result<impl Reply, Rejection> {
    let pair = body.pair().map_err(reject)?;
    let amount = sanitize_amount(&body.amount);

    let quote = convert(&state.resolver, &pair, amount).await.map_err(|e| {
        if matches!(e, RateError::NotFound(_)) {
            state.metrics.lookup_not_found();
        }
        reject(e)
    })?;

    state.metrics.conversion();

    Ok(warp::reply::json(&ConversionReply {
        base: quote.pair.base,
        target: quote.pair.target,
        amount: quote.amount,
        rate: quote.rate,
        converted_amount: quote.converted_amount,
    }))
}

/// `GET /api/currencies`: the currencies offered by the converter.
pub async fn list_currencies() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&SUPPORTED_CURRENCIES))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReply {
    status: &'static str,
    store: String,
    started_at: chrono::DateTime<chrono::Utc>,
    metrics: MetricsSnapshot,
}

/// `GET /health`
pub async fn health(state: AppState) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&HealthReply {
        status: "ok",
        store: state.store.name().to_string(),
        started_at: state.started_at,
        metrics: state.metrics.snapshot(),
    }))
}
