//! Runs a finalized request through a transport and classifies the result.
//!
//! # Design
//! The executor never returns `Err`. Configuration problems found by
//! `RequestBuilder::finalize` become a failure `Outcome` before the transport
//! is touched; transport errors become a failure `Outcome` with no status;
//! everything else goes through `classify`. One call performs at most one
//! round trip.

use tracing::{debug, warn};

use crate::builder::RequestBuilder;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::outcome::{classify, Outcome};

/// Performs a single HTTP round trip.
///
/// Implementations return `Ok` for every response that has a status line,
/// whatever the status, and must not retry.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestExecutor<T> {
    transport: T,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn execute(&self, builder: RequestBuilder) -> Outcome {
        let request = match builder.finalize() {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "request not sent");
                return Outcome::failure(err);
            }
        };

        debug!(method = %request.method, url = %request.url, "executing request");

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "transport failure");
                return Outcome::failure(err);
            }
        };

        debug!(status = response.status, body_len = response.body.len(), "response received");

        let outcome = classify(response.status, &response.body);
        if let Some(err) = outcome.transport_failure() {
            warn!(status = response.status, error = %err, "response body could not be decoded");
        }
        outcome
    }
}
