//! Transport calling convention.
//!
//! # Design
//! The adapter never performs I/O itself. It hands a URL plus
//! `TransportOptions` to whatever implements `Transport`, and reads the reply
//! back through `TransportResponse`. Any HTTP library can sit behind these
//! traits; `reqwest` is wired up in `crate::reqwest_transport`.
//!
//! All option fields use owned types so a transport can move them into a
//! background task without lifetime concerns.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request body handed to the transport.
///
/// `Text` holds JSON text produced by the adapter; `Data` is the caller's
/// value passed through untouched. Serialized externally tagged
/// (`{"text": ..}` / `{"data": ..}`) so string data stays distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestBody {
    Text(String),
    Data(Value),
}

/// Second argument of a transport call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// A transport call described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportCall {
    pub url: String,
    pub options: TransportOptions,
}

/// The HTTP-performing function the adapter wraps.
pub trait Transport: Send + Sync {
    type Response: TransportResponse<Error = Self::Error>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform one request. Error statuses must come back as `Ok` responses;
    /// only failures to obtain a response at all belong in `Err`.
    fn call(
        &self,
        url: &str,
        options: TransportOptions,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}

/// A reply obtained from a `Transport`.
pub trait TransportResponse: Send {
    type Error;

    fn status_code(&self) -> u16;

    /// Reason phrase, if the transport reports one.
    fn status_text(&self) -> Option<String>;

    /// Every response header as a `(name, value)` pair, repeated names
    /// included. Values that are not valid UTF-8 must be decoded, not dropped.
    fn header_pairs(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> + '_;

    /// Decode the body as JSON. An empty body decodes to `Value::Null`.
    /// Consumes the response.
    fn body_json(self) -> impl Future<Output = Result<Value, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_data_body_keeps_its_variant() {
        let body = RequestBody::Data(json!("plain"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, json!({ "data": "plain" }));
        assert_eq!(serde_json::from_value::<RequestBody>(json).unwrap(), body);
    }

    #[test]
    fn text_body_is_tagged() {
        let body = RequestBody::Text(r#"{"me":"you"}"#.to_string());
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "text": r#"{"me":"you"}"# }));
    }

    #[test]
    fn method_uses_uppercase_names() {
        assert_eq!(serde_json::to_value(HttpMethod::Patch).unwrap(), json!("PATCH"));
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
