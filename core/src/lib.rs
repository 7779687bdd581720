//! Fluent request builder, executor and response classifier for JSON REST
//! APIs.
//!
//! # Overview
//! A `RequestBuilder` accumulates method, URL, headers, query parameters,
//! body, timeouts and TLS client identity through chained calls. Executing it
//! performs one blocking round trip through a `Transport` and returns an
//! `Outcome`: a decoded success payload, a decoded API error payload, or a
//! transport failure. Nothing is raised past `execute`.
//!
//! # Design
//! - `RequestBuilder::finalize` turns configuration into a plain-data
//!   `HttpRequest`; the `Transport` seam performs the I/O, so the executor
//!   runs unchanged against stub transports.
//! - `UreqTransport` is the default transport; it builds one agent per call.
//! - `RestClient` hands out builders pre-configured from a `ClientConfig`,
//!   the common starting point for endpoint-specific call-sites.
//! - Payloads are `serde_json::Value`: the core does not know the remote
//!   API's message shapes.
//!
//! ```no_run
//! use rest_core::RequestBuilder;
//!
//! let outcome = RequestBuilder::new()
//!     .set_base_url("http://api.test")
//!     .append_path_segment("user")
//!     .append_path_segment("123")
//!     .set_method_get()
//!     .execute();
//!
//! if outcome.was_successful() {
//!     println!("{:?}", outcome.success_body());
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod outcome;
pub mod tls;
pub mod transport;

pub use builder::{QueryValue, RequestBuilder};
pub use client::RestClient;
pub use config::{ClientConfig, ConfigError, GuardMode};
pub use error::TransportError;
pub use executor::{RequestExecutor, Transport};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::{classify, Outcome};
pub use tls::{ClientIdentity, PemSource};
pub use transport::UreqTransport;
