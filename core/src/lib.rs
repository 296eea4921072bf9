//! Fetch-style HTTP backend adapter.
//!
//! # Overview
//! Normalizes a generic `RequestConfig` into the calling convention of an
//! HTTP transport, and normalizes the transport's reply back into a uniform
//! `NormalizedResponse` or `TransportFailure`.
//!
//! # Design
//! - `FetchBackend` is stateless apart from the transport it wraps.
//! - The mapping is split into `build_call` (request side) and
//!   `parse_response` (response side), both free of I/O, so the I/O boundary
//!   is explicit and the mapping is testable without a network.
//! - Transports plug in through the `Transport` / `TransportResponse` traits.
//!   `reqwest::Client` implements them out of the box; `codec` holds the
//!   query/form flattening and body decoding the bundled transports share.

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod reqwest_transport;
pub mod types;

pub use client::{build_call, parse_response, FetchBackend, FAILURE_STATUS_THRESHOLD};
pub use error::{FetchError, TransportFailure};
pub use http::{HttpMethod, RequestBody, Transport, TransportCall, TransportOptions, TransportResponse};
pub use reqwest_transport::ReqwestError;
pub use types::{NormalizedResponse, RequestConfig};
