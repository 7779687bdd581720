//! Chainable accumulator of request configuration.
//!
//! # Design
//! Every configuration call takes the builder by value, records one setting
//! and hands the builder back, so a request reads as a single chain ending in
//! `execute()`. No configuration call can fail: the required-field checks
//! (URL with a host, method) run in `finalize`, which the executor calls once
//! and turns into a failure `Outcome` when they do not hold.
//!
//! Headers live in one ordered list. Literal lines are appended as given;
//! named headers replace an earlier named header with the same name in place.
//! `Content-Type` and `Content-Length` are written as named headers, so the
//! latest computation is the one sent.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::warn;
use url::{form_urlencoded, Url};

use crate::config::{GuardMode, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS};
use crate::error::TransportError;
use crate::executor::{RequestExecutor, Transport};
use crate::http::{HttpMethod, HttpRequest};
use crate::outcome::Outcome;
use crate::tls::{ClientIdentity, PemSource};
use crate::transport::UreqTransport;

/// A query-string value as handed to `add_query_parameter`.
///
/// Falsy values are dropped when added: empty text, `"0"`, `false`, `0` and
/// absent values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Absent,
}

impl QueryValue {
    /// The encoded form, or `None` when the value is dropped.
    fn render(self) -> Option<String> {
        match self {
            QueryValue::Text(text) if text.is_empty() || text == "0" => None,
            QueryValue::Text(text) => Some(text),
            QueryValue::Flag(true) => Some("1".to_string()),
            QueryValue::Flag(false) | QueryValue::Absent | QueryValue::Integer(0) => None,
            QueryValue::Integer(n) => Some(n.to_string()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Text(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Flag(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Integer(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Integer(value.into())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Absent, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HeaderEntry {
    Line(String),
    Named { name: String, value: String },
}

impl HeaderEntry {
    fn render(&self) -> String {
        match self {
            HeaderEntry::Line(line) => line.clone(),
            HeaderEntry::Named { name, value } => format!("{name}: {value}"),
        }
    }
}

/// Fluent configuration for one request.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    url: Option<String>,
    method: Option<HttpMethod>,
    headers: Vec<HeaderEntry>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    connect_timeout_ms: u64,
    read_timeout_ms: u64,
    certificate: Option<PemSource>,
    key: Option<PemSource>,
    guard_mode: GuardMode,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            method: None,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            certificate: None,
            key: None,
            guard_mode: GuardMode::default(),
        }
    }

    pub fn set_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Append one segment with a single `/` between it and the current URL.
    /// An empty segment is ignored.
    pub fn append_path_segment(mut self, segment: impl AsRef<str>) -> Self {
        let segment = segment.as_ref();
        if segment.is_empty() {
            return self;
        }
        let current = self.url.take().unwrap_or_default();
        self.url = Some(join_path(&current, segment));
        self
    }

    /// Append a multi-segment path such as `/api/user/action`.
    /// Ignored until a base URL is set.
    pub fn append_raw_uri(mut self, uri: impl AsRef<str>) -> Self {
        if let Some(current) = self.url.take() {
            self.url = Some(join_path(&current, uri.as_ref()));
        }
        self
    }

    /// Record a query parameter. Re-adding a name replaces its value in place.
    pub fn add_query_parameter(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let Some(value) = value.into().render() else {
            return self;
        };
        let name = name.into();
        match self.query.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.query.push((name, value)),
        }
        self
    }

    /// Append a literal `"Name: value"` header line.
    pub fn add_header_line(mut self, line: impl Into<String>) -> Self {
        self.headers.push(HeaderEntry::Line(line.into()));
        self
    }

    /// Set a named header, replacing an earlier one with the same name.
    pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let existing = self.headers.iter_mut().find_map(|entry| match entry {
            HeaderEntry::Named { name: n, value: v } if n.eq_ignore_ascii_case(&name) => Some(v),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = value,
            None => self.headers.push(HeaderEntry::Named { name, value }),
        }
        self
    }

    pub fn set_authorization_token(self, token: impl AsRef<str>) -> Self {
        let line = format!("Authorization:{}", token.as_ref());
        self.add_header_line(line)
    }

    /// Add `Authorization: Basic ...`, subject to the configured `GuardMode`.
    ///
    /// Under `Literal` the header is only added when both credentials are
    /// empty; under `Corrected` it is added whenever a username is given.
    pub fn set_basic_authorization(self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let (username, password) = (username.as_ref(), password.as_ref());
        let emit = match self.guard_mode {
            GuardMode::Literal => username.is_empty() && password.is_empty(),
            GuardMode::Corrected => !username.is_empty(),
        };
        if !emit {
            if self.guard_mode == GuardMode::Literal {
                warn!(
                    guard = "basic_authorization",
                    "literal guard suppressed basic authorization for non-empty credentials"
                );
            }
            return self;
        }
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.add_header_line(format!("Authorization: Basic {encoded}"))
    }

    /// Store a JSON payload and describe it with `Content-Type` and
    /// `Content-Length`.
    pub fn set_json_body(mut self, payload: impl Into<Vec<u8>>) -> Self {
        let payload = payload.into();
        let length = payload.len();
        self.body = Some(payload);
        self.set_header("Content-Type", "application/json")
            .set_header("Content-Length", length.to_string())
    }

    pub fn set_method_get(mut self) -> Self {
        self.method = Some(HttpMethod::Get);
        self
    }

    /// Select POST and set `Content-Length` from the body stored so far.
    pub fn set_method_post(mut self) -> Self {
        self.method = Some(HttpMethod::Post);
        self.with_current_content_length()
    }

    /// Select PUT and set `Content-Length` from the body stored so far.
    pub fn set_method_put(mut self) -> Self {
        self.method = Some(HttpMethod::Put);
        self.with_current_content_length()
    }

    pub fn set_method_delete(mut self) -> Self {
        self.method = Some(HttpMethod::Delete);
        self
    }

    pub fn set_connect_timeout_ms(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    pub fn set_read_timeout_ms(mut self, ms: u64) -> Self {
        self.read_timeout_ms = ms;
        self
    }

    pub fn set_client_certificate(mut self, certificate: impl Into<PemSource>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    pub fn set_client_key(mut self, key: impl Into<PemSource>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn set_guard_mode(mut self, guard_mode: GuardMode) -> Self {
        self.guard_mode = guard_mode;
        self
    }

    fn with_current_content_length(self) -> Self {
        let length = self.body.as_ref().map_or(0, Vec::len);
        self.set_header("Content-Length", length.to_string())
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Header lines in the order they will be sent.
    pub fn header_lines(&self) -> Vec<String> {
        self.headers.iter().map(HeaderEntry::render).collect()
    }

    /// Check required fields and flatten everything into an `HttpRequest`.
    pub fn finalize(&self) -> Result<HttpRequest, TransportError> {
        let base = self.url.as_deref().ok_or(TransportError::MissingUrl)?;
        let parsed = Url::parse(base).map_err(|_| TransportError::MissingUrl)?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(TransportError::MissingUrl);
        }
        let method = self.method.ok_or(TransportError::MissingMethod)?;

        let url = if self.query.is_empty() {
            base.to_string()
        } else {
            with_query(base, &self.query)
        };

        Ok(HttpRequest {
            method,
            url,
            headers: self.header_lines(),
            body: self.body.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            identity: self.client_identity(parsed.scheme() == "https"),
        })
    }

    /// Decide whether the configured certificate and key go on the wire.
    fn client_identity(&self, https: bool) -> Option<ClientIdentity> {
        match self.guard_mode {
            GuardMode::Literal => {
                // This guard only enters its attach branch when no certificate
                // exists, so nothing is ever attached.
                if https && self.certificate.is_some() {
                    warn!(
                        guard = "client_certificate",
                        "literal guard ignored the configured client certificate"
                    );
                }
                None
            }
            GuardMode::Corrected => {
                if !https {
                    return None;
                }
                let certificate = self.certificate.clone()?;
                Some(ClientIdentity {
                    certificate,
                    key: self.key.clone(),
                })
            }
        }
    }

    /// Execute over the default ureq transport.
    pub fn execute(self) -> Outcome {
        RequestExecutor::new(UreqTransport::new()).execute(self)
    }

    /// Execute over `transport`.
    pub fn execute_with<T: Transport>(self, transport: &T) -> Outcome {
        RequestExecutor::new(transport).execute(self)
    }
}

/// Join `segment` onto `url` with exactly one `/` at the seam.
fn join_path(url: &str, segment: &str) -> String {
    match (url.ends_with('/'), segment.starts_with('/')) {
        (true, true) => format!("{url}{}", segment.trim_start_matches('/')),
        (false, false) => format!("{url}/{segment}"),
        _ => format!("{url}{segment}"),
    }
}

/// Append the encoded query to `url`, ahead of any `#fragment`.
///
/// `?` starts the query unless the URL already has one, in which case `&`
/// continues it. Neither is added when the URL already ends in `?` or `&`.
fn with_query(url: &str, query: &[(String, String)]) -> String {
    let (head, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let mut joined = head.to_string();
    if !joined.ends_with('?') && !joined.ends_with('&') {
        joined.push(if joined.contains('?') { '&' } else { '?' });
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish();
    joined.push_str(&encoded);
    if let Some(fragment) = fragment {
        joined.push('#');
        joined.push_str(fragment);
    }
    joined
}
