use crate::logic::errors::ApiError;
use failure::{Compat, Error};
use futures::future::{result, FutureResult};
use serde_json::json;
use std::error::Error as StdError;
use warp::{
    filters::body::BodyDeserializeError,
    http::{header::CONTENT_TYPE, Response, StatusCode},
    Rejection,
};

/// Renders client-facing failures as JSON `{"detail": ...}` bodies with their proper status:
/// typed `ApiError`s, and bodies that didn't deserialize. Everything else is passed along.
pub fn recover(err: Rejection) -> FutureResult<Response<String>, Rejection> {
    let rendered = if let Some(cause) = err.find_cause::<Compat<Error>>() {
        cause
            .get_ref()
            .downcast_ref::<ApiError>()
            .map(|api| (status_of(api), api.to_string()))
    } else if let Some(cause) = err.find_cause::<BodyDeserializeError>() {
        Some((StatusCode::BAD_REQUEST, cause.to_string()))
    } else {
        None
    };

    match rendered {
        Some((status, detail)) => result(
            Response::builder()
                .status(status)
                .header(CONTENT_TYPE, "application/json")
                .body(json!({ "detail": detail }).to_string())
                .map_err(|e| warp::reject::custom(Error::from(e).compat())),
        ),
        None => result(Err(err)),
    }
}

/// The response status each client-facing failure maps to.
fn status_of(err: &ApiError) -> StatusCode {
    match *err {
        ApiError::EmailRegistered | ApiError::PeakRegistered | ApiError::OwnerMissing => {
            StatusCode::BAD_REQUEST
        }
        ApiError::UserNotFound => StatusCode::NOT_FOUND,
        ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
    }
}

/// A last-chance handler for errors `recover` passed along. Anything carrying a cause becomes a
/// plain-text 500 naming the whole chain; rejections without one (no route matched, mostly) keep
/// warp's default rendering.
pub fn last_chance(err: Rejection) -> FutureResult<Response<String>, Rejection> {
    if err.is_not_found() {
        return result(Err(err));
    }
    let cause = match err.cause() {
        Some(cause) => cause,
        None => return result(Err(err)),
    };

    let mut msg = format!("Internal Server Error\n\n{}", cause);
    let mut source: Option<&dyn StdError> = cause.source();
    while let Some(cause) = source {
        msg.push('\n');
        msg += &cause.to_string();
        source = cause.source();
    }
    result(
        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(msg)
            .map_err(|e| warp::reject::custom(Error::from(e).compat())),
    )
}
