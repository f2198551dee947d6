use std::error::Error;
use std::fmt;

use warp::reject::Reject;

/// Error type for everything that ends in a `server_error` reply
#[derive(Debug, Clone)]
pub struct HandlerError {
    pub message: String,
    kind: HandlerErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HandlerErrorKind {
    InvalidPayload,
    Upstream,
    PayloadTooLarge,
}

impl HandlerError {
    pub fn invalid_payload(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: HandlerErrorKind::InvalidPayload,
        }
    }

    pub fn upstream(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: HandlerErrorKind::Upstream,
        }
    }

    pub fn payload_too_large(limit: u64) -> Self {
        Self {
            message: format!("request body exceeds {} bytes", limit),
            kind: HandlerErrorKind::PayloadTooLarge,
        }
    }

    /// HTTP status used when the error escapes as a warp rejection
    pub fn status_code(&self) -> u16 {
        match self.kind {
            HandlerErrorKind::PayloadTooLarge => 413,
            _ => 500,
        }
    }

    pub fn is_invalid_payload(&self) -> bool {
        self.kind == HandlerErrorKind::InvalidPayload
    }

    pub fn is_upstream(&self) -> bool {
        self.kind == HandlerErrorKind::Upstream
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for HandlerError {}

impl Reject for HandlerError {}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::invalid_payload(&err.to_string())
    }
}

#[cfg(test)]
mod error_tests {
    use super::HandlerError;

    #[test]
    fn display_is_the_bare_message() {
        let err = HandlerError::upstream("quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn only_oversized_bodies_map_to_413() {
        assert_eq!(HandlerError::payload_too_large(10).status_code(), 413);
        assert_eq!(HandlerError::upstream("slow").status_code(), 500);
        assert_eq!(HandlerError::invalid_payload("bad").status_code(), 500);
    }

    #[test]
    fn json_errors_become_invalid_payload() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: HandlerError = parse_err.into();
        assert!(err.is_invalid_payload());
        assert!(!err.is_upstream());
    }
}
