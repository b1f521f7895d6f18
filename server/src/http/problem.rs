//! Rejection to JSON error response mapping.

use std::convert::Infallible;

use ratedesk_fx::RateError;
use serde::Serialize;
use tracing::error;
use warp::http::StatusCode;
use warp::{reject::Reject, Rejection, Reply};

use crate::auth::AuthError;

/// A core error carried through warp's rejection path.
#[derive(Debug)]
pub struct Problem(pub RateError);

impl Reject for Problem {}

/// An auth gate refusal.
#[derive(Debug)]
pub struct Unauthorized(pub AuthError);

impl Reject for Unauthorized {}

/// Reject with a core error.
pub fn reject(e: RateError) -> Rejection {
    warp::reject::custom(Problem(e))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

fn status_of(e: &RateError) -> StatusCode {
    match e {
        RateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RateError::NotFound(_) => StatusCode::NOT_FOUND,
        RateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn any rejection into a JSON error body with a matching status.
pub async fn recover(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, error, code) = if let Some(Problem(e)) = rejection.find::<Problem>() {
        if let RateError::Internal(detail) = e {
            error!(detail = %detail, "internal error occurred");
        }
        (status_of(e), e.public_message(), e.error_code())
    } else if let Some(Unauthorized(e)) = rejection.find::<Unauthorized>() {
        (StatusCode::UNAUTHORIZED, e.to_string(), "UNAUTHORIZED")
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string(), "NOT_FOUND")
    } else if let Some(e) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid body: {}", e), "INVALID_INPUT")
    } else if let Some(e) = rejection.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string(), "INVALID_INPUT")
    } else if rejection.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected a JSON body".to_string(),
            "UNSUPPORTED_MEDIA_TYPE",
        )
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload too large".to_string(),
            "PAYLOAD_TOO_LARGE",
        )
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Content-Length required".to_string(),
            "LENGTH_REQUIRED",
        )
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
            "METHOD_NOT_ALLOWED",
        )
    } else {
        error!(rejection = ?rejection, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
            "INTERNAL_ERROR",
        )
    };

    let body = warp::reply::json(&ErrorBody { error, code });
    Ok(warp::reply::with_status(body, status))
}
