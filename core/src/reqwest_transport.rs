//! `Transport` implementation for `reqwest::Client`.
//!
//! Headers are applied verbatim, params become the query string and mapping
//! bodies are form-urlencoded, both flattened by `crate::codec`. Text bodies
//! are sent raw. Error statuses come back as ordinary responses;
//! `FetchBackend` decides what fails.

use std::borrow::Cow;
use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::codec::{decode_body, flatten_pairs, latin1};
use crate::http::{HttpMethod, RequestBody, Transport, TransportOptions, TransportResponse};

/// Errors from the reqwest transport.
#[derive(Debug, Error)]
pub enum ReqwestError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

fn with_body(builder: reqwest::RequestBuilder, body: Option<RequestBody>) -> reqwest::RequestBuilder {
    match body {
        Some(RequestBody::Text(text)) => builder.body(text),
        Some(RequestBody::Data(Value::Object(map))) => builder.form(&flatten_pairs(&map)),
        Some(RequestBody::Data(Value::String(text))) => builder.body(text),
        Some(RequestBody::Data(Value::Null)) | None => builder,
        Some(RequestBody::Data(other)) => builder.body(other.to_string()),
    }
}

impl Transport for reqwest::Client {
    type Response = reqwest::Response;
    type Error = ReqwestError;

    fn call(
        &self,
        url: &str,
        options: TransportOptions,
    ) -> impl Future<Output = Result<reqwest::Response, ReqwestError>> + Send {
        let method = options.method.unwrap_or(HttpMethod::Get);
        let mut builder = self.request(method.into(), url);

        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !options.params.is_empty() {
            builder = builder.query(&flatten_pairs(&options.params));
        }
        let request = with_body(builder, options.body).send();

        async move { Ok(request.await?) }
    }
}

impl TransportResponse for reqwest::Response {
    type Error = ReqwestError;

    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    fn status_text(&self) -> Option<String> {
        self.status().canonical_reason().map(str::to_string)
    }

    fn header_pairs(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> + '_ {
        self.headers().iter().map(|(name, value)| {
            let value = match value.to_str() {
                Ok(text) => Cow::Borrowed(text),
                Err(_) => Cow::Owned(latin1(value.as_bytes())),
            };
            (name.as_str(), value)
        })
    }

    async fn body_json(self) -> Result<Value, ReqwestError> {
        let bytes = self.bytes().await?;
        Ok(decode_body(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn methods_map_to_reqwest() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }

    fn built_body(body: Option<RequestBody>) -> Option<Vec<u8>> {
        let client = reqwest::Client::new();
        let request = with_body(client.post("http://localhost/"), body).build().unwrap();
        request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec)
    }

    #[test]
    fn nested_data_is_form_encoded() {
        let body = built_body(Some(RequestBody::Data(json!({ "me": "you", "tags": ["a", "b"] }))));
        assert_eq!(body.as_deref(), Some(&b"me=you&tags%5B%5D=a&tags%5B%5D=b"[..]));
    }

    #[test]
    fn string_data_is_sent_raw() {
        let body = built_body(Some(RequestBody::Data(json!("plain"))));
        assert_eq!(body.as_deref(), Some(&b"plain"[..]));
    }

    #[test]
    fn nested_params_build_a_query() {
        let client = reqwest::Client::new();
        let options = TransportOptions {
            params: json!({ "ids": [1, 2] }).as_object().unwrap().clone(),
            ..TransportOptions::default()
        };
        let request = client
            .get("http://localhost/echo")
            .query(&flatten_pairs(&options.params))
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("ids%5B%5D=1&ids%5B%5D=2"));
    }
}
