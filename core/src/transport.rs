//! Blocking `Transport` over ureq.
//!
//! # Design
//! Each `send` builds its own agent and drops it before returning, so the
//! connection never outlives the call. Status codes are returned as data
//! (`http_status_as_error(false)`) and redirects are not followed; a 3xx is
//! classified like any other non-2xx response. The connect timeout bounds
//! connection setup, the read timeout bounds the whole exchange. A zero
//! timeout means no ceiling.

use std::time::Duration;

use tracing::warn;
use ureq::tls::{parse_pem, ClientCert, PemItem, TlsConfig};

use crate::error::TransportError;
use crate::executor::Transport;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::tls::ClientIdentity;

#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = build_agent(request)?;
        let headers = split_header_lines(&request.headers);
        let url = request.url.as_str();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => {
                let builder = with_headers(agent.get(url), &headers);
                match body {
                    Some(body) => builder.force_send_body().send(body),
                    None => builder.call(),
                }
            }
            HttpMethod::Delete => {
                let builder = with_headers(agent.delete(url), &headers);
                match body {
                    Some(body) => builder.force_send_body().send(body),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => {
                let builder = with_headers(agent.post(url), &headers);
                match body {
                    Some(body) => builder.send(body),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(agent.put(url), &headers);
                match body {
                    Some(body) => builder.send(body),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_vec().map_err(map_error)?;

        Ok(HttpResponse { status, body })
    }
}

fn build_agent(request: &HttpRequest) -> Result<ureq::Agent, TransportError> {
    let mut config = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .max_redirects(0)
        .timeout_connect(ceiling(request.connect_timeout))
        .timeout_global(ceiling(request.read_timeout));

    if let Some(identity) = &request.identity {
        let tls = TlsConfig::builder()
            .client_cert(Some(client_cert(identity)?))
            .build();
        config = config.tls_config(tls);
    }

    Ok(config.build().new_agent())
}

fn ceiling(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

/// Parse the identity's PEM into a certificate chain and private key.
fn client_cert(identity: &ClientIdentity) -> Result<ClientCert, TransportError> {
    let pem = identity.load_pem()?;
    let mut chain = Vec::new();
    let mut key = None;

    for item in parse_pem(&pem) {
        match item.map_err(|e| TransportError::Tls(e.to_string()))? {
            PemItem::Certificate(cert) => chain.push(cert.to_owned()),
            PemItem::PrivateKey(private_key) => key = Some(private_key.to_owned()),
            _ => {}
        }
    }

    if chain.is_empty() {
        return Err(TransportError::Tls("client identity has no certificate".to_string()));
    }
    let key = key.ok_or_else(|| TransportError::Tls("client identity has no private key".to_string()))?;
    Ok(ClientCert::new_with_certs(&chain, key))
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Split `"Name: value"` lines, skipping lines that cannot be sent.
fn split_header_lines(lines: &[String]) -> Vec<(String, String)> {
    lines
        .iter()
        .filter_map(|line| {
            let parsed = split_header_line(line);
            if parsed.is_none() {
                warn!(line = %line, "skipping malformed header line");
            }
            parsed
        })
        .collect()
}

fn split_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

fn map_error(err: ureq::Error) -> TransportError {
    let message = err.to_string();
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout(message),
        ureq::Error::HostNotFound => TransportError::Dns(message),
        ureq::Error::ConnectionFailed => TransportError::Connect(message),
        ureq::Error::Io(io) if is_connect_failure(io.kind()) => TransportError::Connect(message),
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => TransportError::Timeout(message),
        ureq::Error::Tls(_) => TransportError::Tls(message),
        ureq::Error::Http(_) | ureq::Error::BadUri(_) => TransportError::InvalidRequest(message),
        _ => TransportError::Io(message),
    }
}

fn is_connect_failure(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::NotConnected
    )
}
