use thiserror::Error;

/// Failure at the transport boundary (connectivity, HTTP status, body decode).
///
/// The command layer propagates these unmodified; retries, backoff, and
/// timeouts are the transport implementation's concern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("backend rejected the request with status {status}")]
    Status { status: u16 },
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("no transport is configured")]
    Unavailable,
}

/// Errors surfaced by the resource command layer.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A structurally required node was entirely absent from the envelope.
    /// Distinct from "zero entries", which is a valid, non-error outcome.
    #[error("response is missing required element `{0}`")]
    MissingElement(String),
    /// The resource deliberately does not support this operation.
    #[error("`{operation}` is not supported for resource `{resource}`")]
    Unsupported {
        resource: &'static str,
        operation: &'static str,
    },
    #[error("malformed envelope: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CommandError>;
