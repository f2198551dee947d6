use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::constants::{
    CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT, ERROR_METHOD_NOT_ALLOWED, ERROR_SERVER,
};
use crate::handlers::task::Task;

/// Transport-neutral reply produced by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl AiResponse {
    pub fn json(status_code: u16, value: &Value) -> Self {
        Self {
            status_code,
            headers: content_type(CONTENT_TYPE_JSON),
            body: value.to_string(),
        }
    }

    pub fn text(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: content_type(CONTENT_TYPE_TEXT),
            body,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status_code: 405,
            headers: BTreeMap::new(),
            body: ERROR_METHOD_NOT_ALLOWED.to_string(),
        }
    }

    pub fn pong() -> Self {
        Self::json(200, &json!({ "ok": true, "pong": true }))
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "error": message }))
    }

    pub fn server_error(details: &str) -> Self {
        Self::json(500, &json!({ "error": ERROR_SERVER, "details": details }))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type").map(String::as_str)
    }
}

fn content_type(value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), value.to_string())])
}

/// Turns model output into the reply for `task`.
///
/// `getFutureIntel` is re-emitted as JSON when the model kept to the format,
/// otherwise wrapped as `{"text": ...}`; every other task gets plain text.
pub fn shape_response(task: &Task, text: String) -> AiResponse {
    match task {
        Task::FutureIntel => match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => AiResponse::json(200, &parsed),
            Err(_) => AiResponse::json(200, &json!({ "text": text })),
        },
        _ => AiResponse::text(200, text),
    }
}

#[cfg(test)]
mod response_tests {
    use serde_json::{Value, json};

    use super::*;

    fn body_json(response: &AiResponse) -> Value {
        serde_json::from_str(&response.body).expect("body should be JSON")
    }

    #[test]
    fn future_intel_valid_json_is_passed_through() {
        let response = shape_response(
            &Task::FutureIntel,
            r#"{"summary":"x","signals":[],"confidence":"low"}"#.to_string(),
        );
        assert_eq!(response.status_code, 200);
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(
            body_json(&response),
            json!({"summary": "x", "signals": [], "confidence": "low"})
        );
    }

    #[test]
    fn future_intel_invalid_json_is_wrapped() {
        let response = shape_response(&Task::FutureIntel, "not json".to_string());
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"text":"not json"}"#);
    }

    #[test]
    fn fenced_json_is_not_unwrapped() {
        let raw = "```json\n{\"summary\":\"x\"}\n```".to_string();
        let response = shape_response(&Task::FutureIntel, raw.clone());
        assert_eq!(body_json(&response), json!({ "text": raw }));
    }

    #[test]
    fn other_tasks_return_plain_text() {
        for task in [Task::DealAssassin, Task::Generic] {
            let response = shape_response(&task, "• Laptop A - RM2999".to_string());
            assert_eq!(response.status_code, 200);
            assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
            assert_eq!(response.body, "• Laptop A - RM2999");
        }
    }

    #[test]
    fn fixed_replies_match_the_wire_contract() {
        assert_eq!(AiResponse::pong().body, r#"{"ok":true,"pong":true}"#);

        let not_allowed = AiResponse::method_not_allowed();
        assert_eq!(not_allowed.status_code, 405);
        assert_eq!(not_allowed.body, "Method Not Allowed");
        assert!(not_allowed.headers.is_empty());

        assert_eq!(
            body_json(&AiResponse::server_error("boom")),
            json!({"error": "server_error", "details": "boom"})
        );
    }
}
