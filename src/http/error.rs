use crate::constants::{ERROR_GEMINI_UNAVAILABLE, ERROR_TIMEOUT};
use crate::error::HandlerError;

pub fn map_reqwest_error(err: reqwest::Error) -> HandlerError {
    if err.is_timeout() {
        HandlerError::upstream(ERROR_TIMEOUT)
    } else if err.is_connect() {
        HandlerError::upstream(&format!("{}: {}", ERROR_GEMINI_UNAVAILABLE, err))
    } else {
        log::error!("HTTP request failed: {}", err);
        HandlerError::upstream(&format!("Gemini request failed: {}", err))
    }
}
