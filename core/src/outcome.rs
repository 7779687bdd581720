//! The tri-state result of one request attempt and the classifier that
//! produces it.
//!
//! # Design
//! Classification is a pure function of `(status, body)`. A 2xx status routes
//! a non-empty body into `success_body`, anything else into `error_body`; a
//! body that is not JSON replaces either with a decode failure. The two
//! payload slots are never both set, and a payload is never set alongside a
//! transport failure.

use serde_json::Value;

use crate::error::TransportError;

/// Result of executing one request.
#[derive(Debug)]
pub struct Outcome {
    status: Option<u16>,
    success_body: Option<Value>,
    error_body: Option<Value>,
    transport_failure: Option<TransportError>,
}

impl Outcome {
    /// An outcome that carries only a failure and whatever status was seen.
    pub fn failure(error: TransportError) -> Self {
        let status = match &error {
            TransportError::Decode { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            status,
            success_body: None,
            error_body: None,
            transport_failure: Some(error),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn success_body(&self) -> Option<&Value> {
        self.success_body.as_ref()
    }

    pub fn error_body(&self) -> Option<&Value> {
        self.error_body.as_ref()
    }

    pub fn transport_failure(&self) -> Option<&TransportError> {
        self.transport_failure.as_ref()
    }

    /// Status in `200..=299` and no transport failure.
    pub fn was_successful(&self) -> bool {
        matches!(self.status, Some(200..=299)) && self.transport_failure.is_none()
    }

    /// Take the success payload, leaving the rest behind.
    pub fn into_success_body(self) -> Option<Value> {
        self.success_body
    }

    pub fn into_error_body(self) -> Option<Value> {
        self.error_body
    }
}

/// Turn a raw status and body into an `Outcome`.
pub fn classify(status: u16, body: &[u8]) -> Outcome {
    let success = (200..=299).contains(&status);

    if body.is_empty() {
        return Outcome {
            status: Some(status),
            success_body: None,
            error_body: None,
            transport_failure: None,
        };
    }

    let decoded = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(source) => return Outcome::failure(TransportError::Decode { status, source }),
    };

    let (success_body, error_body) = if success {
        (Some(decoded), None)
    } else {
        (None, Some(decoded))
    };

    Outcome {
        status: Some(status),
        success_body,
        error_body,
        transport_failure: None,
    }
}
