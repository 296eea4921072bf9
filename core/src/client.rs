//! Request/response adapter over a pluggable transport.
//!
//! # Design
//! `FetchBackend` holds only its transport and carries no mutable state
//! between calls. The mapping work is split into two I/O-free halves:
//! `build_call` turns a `RequestConfig` into a `TransportCall`, and
//! `parse_response` turns the pieces of a reply into the normalized shape.
//! `FetchBackend::request` is the thin async glue between them.

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, TransportFailure};
use crate::http::{RequestBody, Transport, TransportCall, TransportOptions, TransportResponse};
use crate::types::{NormalizedResponse, RequestConfig};

/// Statuses at or above this value reject.
pub const FAILURE_STATUS_THRESHOLD: u16 = 400;

const CONTENT_TYPE: &str = "Content-Type";
const JSON_MEDIA_TYPE: &str = "application/json";
const HEADER_VALUE_SEPARATOR: &str = ", ";

/// Adapts `RequestConfig` values to a `Transport` and normalizes its replies.
#[derive(Debug, Clone)]
pub struct FetchBackend<T> {
    transport: T,
}

impl<T: Transport> FetchBackend<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke the transport once and normalize its reply.
    ///
    /// Resolves with the normalized response when the status is below
    /// `FAILURE_STATUS_THRESHOLD`, otherwise fails with
    /// `FetchError::Failure`. Errors from the transport call or from body
    /// decoding come back as `FetchError::Transport`.
    pub async fn request(
        &self,
        config: &RequestConfig,
    ) -> Result<NormalizedResponse, FetchError<T::Error>> {
        let call = build_call(config).map_err(FetchError::Encode)?;
        debug!(
            url = %call.url,
            method = call.options.method.map(|m| m.as_str()),
            has_body = call.options.body.is_some(),
            "dispatching request"
        );

        let response = self
            .transport
            .call(&call.url, call.options)
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status_code();
        let status_text = response.status_text();
        let headers = collect_headers(response.header_pairs());
        let data = response.body_json().await.map_err(FetchError::Transport)?;

        let outcome = parse_response(status, status_text, headers, data);
        debug!(url = %config.url, status, ok = outcome.is_ok(), "request completed");
        outcome.map_err(FetchError::from)
    }
}

/// Map a request configuration onto the transport's calling convention.
///
/// `data` is sent as JSON text when the `Content-Type` header mentions
/// `application/json`, and as the mapping itself otherwise. Headers, params
/// and method pass through untouched.
pub fn build_call(config: &RequestConfig) -> Result<TransportCall, serde_json::Error> {
    let body = match &config.data {
        Some(data) if wants_json(config) => Some(RequestBody::Text(serde_json::to_string(data)?)),
        Some(data) => Some(RequestBody::Data(data.clone())),
        None => None,
    };

    Ok(TransportCall {
        url: config.url.clone(),
        options: TransportOptions {
            method: config.method,
            body,
            headers: config.headers.clone(),
            params: config.params.clone(),
        },
    })
}

/// Build the normalized response and decide between success and failure.
pub fn parse_response(
    status: u16,
    status_text: Option<String>,
    headers: BTreeMap<String, String>,
    data: Value,
) -> Result<NormalizedResponse, TransportFailure> {
    let response = NormalizedResponse {
        data,
        headers,
        status_code: status,
    };
    if status < FAILURE_STATUS_THRESHOLD {
        return Ok(response);
    }
    Err(TransportFailure {
        message: status_text,
        response,
    })
}

/// Flatten header pairs into a map. Values of a repeated name are joined
/// with `", "` in arrival order.
fn collect_headers<'a>(
    pairs: impl Iterator<Item = (&'a str, Cow<'a, str>)>,
) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in pairs {
        match headers.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
            Entry::Occupied(mut slot) => {
                let joined: &mut String = slot.get_mut();
                joined.push_str(HEADER_VALUE_SEPARATOR);
                joined.push_str(&value);
            }
        }
    }
    headers
}

// Case-sensitive lookup.
fn wants_json(config: &RequestConfig) -> bool {
    config
        .headers
        .get(CONTENT_TYPE)
        .is_some_and(|value| value.contains(JSON_MEDIA_TYPE))
}
