//! Client certificate and key handles for mutual TLS.
//!
//! Handles are opaque to the builder: it stores them and the executor decides
//! whether they are attached. Material is only read when a transport actually
//! installs it, so a missing file surfaces as a TLS failure on the outcome
//! rather than while the request is being configured.

use std::path::{Path, PathBuf};

use crate::error::TransportError;

/// Where PEM-encoded material comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PemSource {
    /// A file on disk, read at send time.
    Path(PathBuf),
    /// PEM content held in memory.
    Pem(Vec<u8>),
}

impl PemSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        PemSource::Path(path.into())
    }

    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Self {
        PemSource::Pem(pem.into())
    }

    /// Read the PEM bytes.
    pub fn load(&self) -> Result<Vec<u8>, TransportError> {
        match self {
            PemSource::Path(path) => std::fs::read(path)
                .map_err(|e| TransportError::Tls(format!("cannot read {}: {e}", path.display()))),
            PemSource::Pem(bytes) => Ok(bytes.clone()),
        }
    }
}

impl From<PathBuf> for PemSource {
    fn from(path: PathBuf) -> Self {
        PemSource::Path(path)
    }
}

impl From<&Path> for PemSource {
    fn from(path: &Path) -> Self {
        PemSource::Path(path.to_path_buf())
    }
}

/// A certificate chain plus the private key that goes with it.
///
/// When `key` is `None` the key is expected inside the certificate PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub certificate: PemSource,
    pub key: Option<PemSource>,
}

impl ClientIdentity {
    /// Concatenated PEM of certificate and key, ready for a PEM parser.
    pub fn load_pem(&self) -> Result<Vec<u8>, TransportError> {
        let mut pem = self.certificate.load()?;
        if let Some(key) = &self.key {
            if !pem.ends_with(b"\n") {
                pem.push(b'\n');
            }
            pem.extend(key.load()?);
        }
        Ok(pem)
    }
}
