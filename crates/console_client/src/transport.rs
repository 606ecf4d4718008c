//! The abstract transport seam and its HTTP implementation.
//!
//! Reads go out query-encoded, writes body-encoded. The transport hands the
//! command layer the JSON rendition of the legacy response document; it never
//! retries, caches, or interprets envelopes.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::error::TransportError;
use tracing::debug;
use url::Url;

use crate::params::Params;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Query-encoded read returning the parsed envelope.
    async fn read(&self, params: &Params) -> Result<Value, TransportError>;

    /// Body-encoded write returning the parsed envelope.
    async fn write(&self, params: &Params) -> Result<Value, TransportError>;

    /// Body-encoded write returning the unparsed payload (file content);
    /// export responses bypass envelope parsing entirely.
    async fn write_raw(&self, params: &Params) -> Result<Vec<u8>, TransportError>;
}

/// Null transport for wiring defaults; every call fails with a clear error.
pub struct MissingTransport;

#[async_trait]
impl Transport for MissingTransport {
    async fn read(&self, _params: &Params) -> Result<Value, TransportError> {
        Err(TransportError::Unavailable)
    }

    async fn write(&self, _params: &Params) -> Result<Value, TransportError> {
        Err(TransportError::Unavailable)
    }

    async fn write_raw(&self, _params: &Params) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::Unavailable)
    }
}

pub struct HttpTransport {
    http: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| TransportError::Request(format!("invalid endpoint: {err}")))?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    async fn send_read(&self, params: &Params) -> Result<reqwest::Response, TransportError> {
        debug!(cmd = params.get("cmd"), "dispatching read");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&params.as_pairs())
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)
    }

    async fn send_write(&self, params: &Params) -> Result<reqwest::Response, TransportError> {
        debug!(cmd = params.get("cmd"), "dispatching write");
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&params.as_pairs())
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn read(&self, params: &Params) -> Result<Value, TransportError> {
        let response = self.send_read(params).await?;
        response
            .json()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))
    }

    async fn write(&self, params: &Params) -> Result<Value, TransportError> {
        let response = self.send_write(params).await?;
        response
            .json()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))
    }

    async fn write_raw(&self, params: &Params) -> Result<Vec<u8>, TransportError> {
        let response = self.send_write(params).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    TransportError::Request(err.to_string())
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
        })
    }
}
