use std::sync::Arc;

use serde_json::Value;
use shared::error::Result;

use crate::{params::Params, transport::Transport};

/// Base command: merges parameter layers and dispatches one request.
///
/// Precedence, lowest first: constructor-time defaults, per-call parameters,
/// call-site overrides. The operation discriminator is always sent as `cmd`.
#[derive(Clone)]
pub struct TransportCommand {
    transport: Arc<dyn Transport>,
    defaults: Params,
}

impl TransportCommand {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_defaults(transport, Params::new())
    }

    pub fn with_defaults(transport: Arc<dyn Transport>, defaults: Params) -> Self {
        Self {
            transport,
            defaults,
        }
    }

    fn assemble(&self, cmd: &str, params: &Params, overrides: &Params) -> Params {
        let mut merged = self.defaults.clone();
        merged.merge(params);
        merged.merge(overrides);
        merged.set("cmd", cmd);
        merged
    }

    pub async fn read(&self, cmd: &str, params: &Params) -> Result<Value> {
        self.read_with(cmd, params, &Params::new()).await
    }

    pub async fn read_with(
        &self,
        cmd: &str,
        params: &Params,
        overrides: &Params,
    ) -> Result<Value> {
        let merged = self.assemble(cmd, params, overrides);
        Ok(self.transport.read(&merged).await?)
    }

    pub async fn write(&self, cmd: &str, params: &Params) -> Result<Value> {
        let merged = self.assemble(cmd, params, &Params::new());
        Ok(self.transport.write(&merged).await?)
    }

    pub async fn write_raw(&self, cmd: &str, params: &Params) -> Result<Vec<u8>> {
        let merged = self.assemble(cmd, params, &Params::new());
        Ok(self.transport.write_raw(&merged).await?)
    }
}
