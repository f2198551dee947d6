use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::HandlerError;

/// Request body fields; all optional, `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_prompt: Option<String>,
    /// Only consulted by the `generic` task.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Payload {
    /// Parses the raw event body; an absent body is an empty payload.
    ///
    /// Only a JSON object carries fields. Arrays, strings, numbers and booleans
    /// have none and yield an empty payload; `null` is rejected.
    pub fn parse(body: Option<&str>) -> Result<Self, HandlerError> {
        let raw = body.unwrap_or("{}");
        match serde_json::from_str::<Value>(raw)? {
            value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
            Value::Null => Err(HandlerError::invalid_payload(
                "request body must not be null",
            )),
            _ => Ok(Payload::default()),
        }
    }

    /// Trimmed user prompt, `None` when missing or blank.
    pub fn trimmed_user_prompt(&self) -> Option<&str> {
        self.user_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
    }
}

// Callers sometimes send a bare number as the prompt. Falsy scalars (`0`,
// `false`) count as no prompt at all.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "userPrompt must be a string, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod payload_tests {
    use super::Payload;

    #[test]
    fn absent_body_is_empty_payload() {
        assert_eq!(Payload::parse(None).unwrap(), Payload::default());
    }

    #[test]
    fn reads_camel_case_fields() {
        let payload = Payload::parse(Some(
            r#"{"task":"generic","userPrompt":"hi","systemPrompt":"be brief","extra":1}"#,
        ))
        .unwrap();
        assert_eq!(payload.task.as_deref(), Some("generic"));
        assert_eq!(payload.user_prompt.as_deref(), Some("hi"));
        assert_eq!(payload.system_prompt.as_deref(), Some("be brief"));
    }

    #[test]
    fn nulls_are_absent_and_numbers_are_coerced() {
        let payload = Payload::parse(Some(r#"{"task":null,"userPrompt":42}"#)).unwrap();
        assert!(payload.task.is_none());
        assert_eq!(payload.user_prompt.as_deref(), Some("42"));
    }

    #[test]
    fn zero_and_false_prompts_are_absent() {
        for body in [r#"{"userPrompt":0}"#, r#"{"userPrompt":0.0}"#, r#"{"userPrompt":false}"#] {
            let payload = Payload::parse(Some(body)).unwrap();
            assert!(payload.user_prompt.is_none(), "body {}", body);
        }
        let payload = Payload::parse(Some(r#"{"userPrompt":true}"#)).unwrap();
        assert_eq!(payload.trimmed_user_prompt(), Some("true"));
        let payload = Payload::parse(Some(r#"{"userPrompt":-3}"#)).unwrap();
        assert_eq!(payload.trimmed_user_prompt(), Some("-3"));
    }

    #[test]
    fn non_object_bodies_have_no_fields() {
        for body in [r#"["ping"]"#, r#""ping""#, "42", "true"] {
            assert_eq!(Payload::parse(Some(body)).unwrap(), Payload::default(), "body {}", body);
        }
    }

    #[test]
    fn null_body_is_rejected() {
        let err = Payload::parse(Some("null")).unwrap_err();
        assert!(err.is_invalid_payload());
    }

    #[test]
    fn malformed_body_is_an_invalid_payload_error() {
        let err = Payload::parse(Some("{not json")).unwrap_err();
        assert!(err.is_invalid_payload());
    }

    #[test]
    fn object_user_prompt_is_rejected() {
        assert!(Payload::parse(Some(r#"{"userPrompt":{"a":1}}"#)).is_err());
    }

    #[test]
    fn blank_user_prompt_is_treated_as_missing() {
        let payload = Payload::parse(Some(r#"{"userPrompt":"  \n "}"#)).unwrap();
        assert!(payload.trimmed_user_prompt().is_none());

        let payload = Payload::parse(Some(r#"{"userPrompt":"  laptops under 3k  "}"#)).unwrap();
        assert_eq!(payload.trimmed_user_prompt(), Some("laptops under 3k"));
    }
}
