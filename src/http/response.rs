use crate::handlers::AiResponse;

/// Converts a handler reply into the warp response sent to the client.
pub fn into_warp_response(response: AiResponse) -> warp::reply::Response {
    let content_length = response.body.len();
    let status = warp::http::StatusCode::from_u16(response.status_code)
        .unwrap_or(warp::http::StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = warp::http::Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .header("Content-Length", content_length.to_string())
        .body(response.body.into())
        .unwrap_or_else(|_| {
            let mut fallback = warp::http::Response::new("Internal Server Error".into());
            *fallback.status_mut() = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[cfg(test)]
mod response_conversion_tests {
    use super::into_warp_response;
    use crate::handlers::AiResponse;

    #[test]
    fn copies_status_headers_and_length() {
        let reply = into_warp_response(AiResponse::text(200, "héllo".to_string()));
        assert_eq!(reply.status().as_u16(), 200);
        assert_eq!(
            reply.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(reply.headers()["Content-Length"], "6");
    }

    #[test]
    fn method_not_allowed_has_no_content_type() {
        let reply = into_warp_response(AiResponse::method_not_allowed());
        assert_eq!(reply.status().as_u16(), 405);
        assert!(reply.headers().get("Content-Type").is_none());
    }
}
