//! HTTP transport types shared by the builder, executor and transports.
//!
//! # Design
//! These types describe a finalized request and a raw response as plain data.
//! `RequestBuilder::finalize` produces an `HttpRequest` without touching the
//! network; a `Transport` performs the round-trip and hands back an
//! `HttpResponse`. Keeping the boundary as data lets the executor run against
//! stub transports in tests.

use std::fmt;
use std::time::Duration;

use crate::tls::ClientIdentity;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request whose configuration has been checked and flattened.
///
/// `url` already carries the encoded query string. `headers` holds literal
/// `"Name: value"` lines in insertion order; the transport is responsible for
/// splitting them.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<String>,
    pub body: Option<Vec<u8>>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub identity: Option<ClientIdentity>,
}

/// A raw response as returned by a transport.
///
/// Only the status and body reach classification; response headers are not
/// carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
