use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::error::TransportError;

use crate::{params::Params, transport::Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
    WriteRaw,
}

/// Transport double that records every dispatched call and replays queued
/// envelopes in order.
pub struct RecordingTransport {
    calls: Mutex<Vec<(CallKind, Params)>>,
    responses: Mutex<VecDeque<Value>>,
    raw: Vec<u8>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Self::with_responses(Vec::new())
    }

    pub fn with_response(response: Value) -> Arc<Self> {
        Self::with_responses(vec![response])
    }

    pub fn with_responses(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
            raw: b"raw-export-payload".to_vec(),
        })
    }

    fn record(&self, kind: CallKind, params: &Params) {
        self.calls.lock().unwrap().push((kind, params.clone()));
    }

    fn next_response(&self) -> Value {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| json!({}))
    }

    pub fn calls(&self) -> Vec<(CallKind, Params)> {
        self.calls.lock().unwrap().clone()
    }

    /// The single recorded call, asserting there was exactly one.
    pub fn single_call(&self) -> (CallKind, Params) {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one transport call");
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn read(&self, params: &Params) -> Result<Value, TransportError> {
        self.record(CallKind::Read, params);
        Ok(self.next_response())
    }

    async fn write(&self, params: &Params) -> Result<Value, TransportError> {
        self.record(CallKind::Write, params);
        Ok(self.next_response())
    }

    async fn write_raw(&self, params: &Params) -> Result<Vec<u8>, TransportError> {
        self.record(CallKind::WriteRaw, params);
        Ok(self.raw.clone())
    }
}
