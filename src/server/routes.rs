use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use futures_util::{Stream, TryStreamExt};
use warp::Filter;
use warp::http::Method;
use warp::path::FullPath;

use crate::constants::MAX_BODY_SIZE_BYTES;
use crate::error::HandlerError;
use crate::handlers::{AiEvent, RequestContext, handle_ai_request};
use crate::http::{GeminiClient, into_warp_response};
use crate::server::HandlerServer;

/// Single catch-all route; method and path checks belong to the handler.
pub fn create_routes(
    server: Arc<HandlerServer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_server_state = warp::any().map(move || server.clone());

    warp::method()
        .and(warp::path::full())
        .and(body_size_guard())
        .and(limited_body())
        .and(with_server_state)
        .and_then(
            |method: Method, path: FullPath, body: Bytes, s: Arc<HandlerServer>| async move {
                let event = build_event(&method, path.as_str(), &body);
                let response = handle_ai_request(create_context(&s), event).await;
                Ok::<_, warp::Rejection>(into_warp_response(response))
            },
        )
}

fn create_context(s: &Arc<HandlerServer>) -> RequestContext<'_, GeminiClient> {
    RequestContext {
        environment: &s.environment,
        model: &s.gemini,
    }
}

pub fn build_event(method: &Method, path: &str, body: &[u8]) -> AiEvent {
    AiEvent {
        http_method: method.as_str().to_string(),
        path: path.to_string(),
        body: if body.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(body).into_owned())
        },
    }
}

fn body_size_guard() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|length: Option<u64>| async move {
            match length {
                Some(len) if len > MAX_BODY_SIZE_BYTES => Err(warp::reject::custom(
                    HandlerError::payload_too_large(MAX_BODY_SIZE_BYTES),
                )),
                _ => Ok(()),
            }
        })
        .untuple_one()
}

// Chunked uploads carry no content-length, so the limit is also enforced
// while reading.
fn limited_body() -> impl Filter<Extract = (Bytes,), Error = warp::Rejection> + Clone {
    warp::body::stream().and_then(|stream| async move {
        collect_body(stream, MAX_BODY_SIZE_BYTES)
            .await
            .map_err(warp::reject::custom)
    })
}

pub async fn collect_body<S, B>(stream: S, limit: u64) -> Result<Bytes, HandlerError>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let mut stream = std::pin::pin!(stream);
    let mut body = BytesMut::new();

    while let Some(chunk) = stream.try_next().await.map_err(|e| {
        HandlerError::invalid_payload(&format!("failed to read request body: {}", e))
    })? {
        if (body.len() + chunk.remaining()) as u64 > limit {
            return Err(HandlerError::payload_too_large(limit));
        }
        body.put(chunk);
    }

    Ok(body.freeze())
}

#[cfg(test)]
mod routes_tests {
    use bytes::Bytes;
    use futures_util::stream;
    use warp::http::Method;

    use super::{build_event, collect_body};

    fn chunks(
        parts: Vec<&'static str>,
    ) -> impl futures_util::Stream<Item = Result<Bytes, warp::Error>> {
        stream::iter(
            parts
                .into_iter()
                .map(|part| Ok::<Bytes, warp::Error>(Bytes::from_static(part.as_bytes()))),
        )
    }

    #[tokio::test]
    async fn collects_chunks_within_the_limit() {
        let body = collect_body(chunks(vec![r#"{"task":"#, r#""ping"}"#]), 64)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"task":"ping"}"#);
    }

    #[tokio::test]
    async fn chunked_body_over_the_limit_is_rejected() {
        let err = collect_body(chunks(vec!["0123456789", "0123456789"]), 15)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 413);
    }

    #[tokio::test]
    async fn body_exactly_at_the_limit_is_accepted() {
        let body = collect_body(chunks(vec!["01234", "56789"]), 10).await.unwrap();
        assert_eq!(body.len(), 10);
    }

    #[test]
    fn empty_body_becomes_none() {
        let event = build_event(&Method::GET, "/api/callGemini", b"");
        assert_eq!(event.http_method, "GET");
        assert_eq!(event.path, "/api/callGemini");
        assert!(event.body.is_none());
    }

    #[test]
    fn body_bytes_are_kept_as_text() {
        let event = build_event(&Method::POST, "/", br#"{"task":"ping"}"#);
        assert_eq!(event.body.as_deref(), Some(r#"{"task":"ping"}"#));
    }
}
