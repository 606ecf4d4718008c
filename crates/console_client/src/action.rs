use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{
    envelope::{attr, child, child_text},
    error::Result,
};

use crate::{command::TransportCommand, params::Params};

/// Outcome of a mutating call.
///
/// Transport success does not imply domain success: a "name already exists"
/// failure arrives as a message inside an otherwise-successful envelope. This
/// layer wraps it without interpreting it; inspecting `message` is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub id: Option<String>,
    pub action: String,
    pub message: String,
}

impl ActionResult {
    /// Wrap a raw write envelope. Writes come back as an `action_result`
    /// node carrying `action`, `message`, and sometimes the id of the
    /// resource acted on; a missing node still produces a result, never an
    /// error.
    pub fn from_envelope(root: &Value) -> Self {
        let node = child(root, "action_result").unwrap_or(root);
        Self {
            id: attr(node, "id")
                .or_else(|| child_text(node, "id"))
                .map(str::to_owned),
            action: child_text(node, "action").unwrap_or_default().to_owned(),
            message: child_text(node, "message").unwrap_or_default().to_owned(),
        }
    }
}

/// Posts a mutating request and wraps the response uniformly.
#[derive(Clone)]
pub struct ActionCommand {
    cmd: TransportCommand,
}

impl ActionCommand {
    pub fn new(cmd: TransportCommand) -> Self {
        Self { cmd }
    }

    pub async fn action(&self, cmd: &str, params: &Params) -> Result<ActionResult> {
        let envelope = self.cmd.write(cmd, params).await?;
        Ok(ActionResult::from_envelope(&envelope))
    }
}
