use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

/// Description of a request as received by `/echo`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    /// Query string exactly as received, still percent-encoded.
    pub raw_query: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/headers", get(odd_headers))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    tracing::info!(%method, body_len = body.len(), "echo");
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        raw_query: uri.query().unwrap_or_default().to_string(),
        query,
        headers,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    tracing::info!(code, "status");
    if matches!(
        status,
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
    ) {
        return (status, [("test", "here")]).into_response();
    }
    (status, [("test", "here")], Json(json!({ "content": "Yes" }))).into_response()
}

/// Replies with a repeated header and a header holding a non-UTF-8 byte.
async fn odd_headers() -> Response {
    let mut response = Json(json!({ "content": "Yes" })).into_response();
    let headers = response.headers_mut();
    let multi = HeaderName::from_static("x-multi");
    headers.append(multi.clone(), HeaderValue::from_static("a"));
    headers.append(multi, HeaderValue::from_static("b"));
    if let Ok(value) = HeaderValue::from_bytes(b"caf\xe9") {
        headers.insert(HeaderName::from_static("x-name"), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "POST".to_string(),
            raw_query: "asc=1".to_string(),
            query: BTreeMap::from([("asc".to_string(), "1".to_string())]),
            headers: BTreeMap::new(),
            body: r#"{"me":"you"}"#.to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["query"]["asc"], "1");
        assert_eq!(json["body"], r#"{"me":"you"}"#);
    }

    #[test]
    fn echo_rejects_missing_method() {
        let result: Result<Echo, _> =
            serde_json::from_str(r#"{"raw_query":"","query":{},"headers":{},"body":""}"#);
        assert!(result.is_err());
    }
}
