//! Error conversions between external crates and the domain error type

use concord_domain::ConcordError;

/// Newtype carrying a domain error out of infra code.
///
/// Exists so `From` impls for external error types can live in this crate;
/// `?` then flows through `InfraError` into `ConcordError`.
#[derive(Debug)]
pub struct InfraError(pub ConcordError);

impl From<InfraError> for ConcordError {
    fn from(err: InfraError) -> Self {
        err.0
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self(ConcordError::Network(format!("request timed out: {err}")));
        }
        if err.is_connect() {
            return Self(ConcordError::Network(format!("connection failed: {err}")));
        }
        if err.is_decode() {
            return Self(ConcordError::Internal(format!("response decoding failed: {err}")));
        }
        Self(ConcordError::Network(err.to_string()))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        Self(ConcordError::Internal(format!("JSON (de)serialization failed: {err}")))
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}
