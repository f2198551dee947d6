use std::convert::Infallible;

use serde_json::json;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::HandlerError;

pub async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(handler_err) = rejection.find::<HandlerError>() {
        (
            StatusCode::from_u16(handler_err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            handler_err.message.clone(),
        )
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "endpoint not found".to_string())
    } else if rejection.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid header".to_string())
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "request body too large".to_string(),
        )
    } else {
        log::error!("unhandled rejection: {:?}", rejection);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        status,
    ))
}
