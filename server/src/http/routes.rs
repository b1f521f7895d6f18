//! Route table.

use std::collections::HashMap;
use std::convert::Infallible;

use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

use crate::http::handlers;
use crate::http::problem::{self, Unauthorized};
use crate::state::AppState;

/// Largest request body accepted, in bytes.
const MAX_BODY: u64 = 16 * 1024;

/// Build the full HTTP API over `state`.
pub fn create(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let rates = warp::path!("api" / "convert");

    let get_rates = rates
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_rates);

    let add_rate = rates
        .and(warp::post())
        .and(with_admin(state.clone()))
        .and(warp::body::content_length_limit(MAX_BODY))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::add_rate);

    let update_rate = rates
        .and(warp::put())
        .and(with_admin(state.clone()))
        .and(warp::body::content_length_limit(MAX_BODY))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::update_rate);

    let delete_rate = rates
        .and(warp::delete())
        .and(with_admin(state.clone()))
        .and(warp::query::<HashMap<String, String>>())
        .and(optional_body())
        .and(with_state(state.clone()))
        .and_then(handlers::delete_rate);

    let convert_amount = warp::path!("api" / "currency" / "convert")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::convert_amount);

    let currencies = warp::path!("api" / "currencies")
        .and(warp::get())
        .and_then(handlers::list_currencies);

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::health);

    get_rates
        .or(add_rate)
        .or(update_rate)
        .or(delete_rate)
        .or(convert_amount)
        .or(currencies)
        .or(health)
        .recover(problem::recover)
        .with(warp::trace::request())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// The raw request body, or an empty one when no `Content-Length` was sent.
fn optional_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    let sized = warp::body::content_length_limit(MAX_BODY).and(warp::body::bytes());
    let absent = warp::header::optional::<String>("content-length").and_then(
        |length: Option<String>| async move {
            match length {
                None => Ok(Bytes::new()),
                Some(_) => Err(warp::reject::not_found()),
            }
        },
    );

    sized.or(absent).unify()
}

/// Passes only requests carrying an accepted bearer token.
fn with_admin(state: AppState) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and_then(move |header: Option<String>| {
            let state = state.clone();
            async move {
                state.auth.authorize(header.as_deref()).map_err(|e| {
                    state.metrics.auth_rejection();
                    warp::reject::custom(Unauthorized(e))
                })
            }
        })
        .untuple_one()
}
