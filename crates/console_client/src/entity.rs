use std::{marker::PhantomData, sync::Arc};

use serde_json::Value;
use shared::{
    envelope::{as_list, attr},
    error::Result,
    filter::Filter,
    model::Model,
};
use tracing::debug;

use crate::{
    action::{ActionCommand, ActionResult},
    bulk::BulkSelection,
    command::TransportCommand,
    params::Params,
};

/// Navigates an envelope to the node a resource type nests its payload
/// under. Each resource type puts it somewhere different, so the path is
/// injected data, not a schema.
pub type ElementLocator = Arc<dyn for<'a> Fn(&'a Value) -> Option<&'a Value> + Send + Sync>;

/// Locator walking a fixed key path from the envelope root.
pub fn element_path(path: &'static [&'static str]) -> ElementLocator {
    Arc::new(move |root| {
        let mut current = root;
        for key in path {
            current = current.get(key)?;
        }
        Some(current)
    })
}

/// Generic get/clone/delete/export for a single resource.
pub struct EntityCommand<M: Model> {
    cmd: TransportCommand,
    actions: ActionCommand,
    name: &'static str,
    id_key: String,
    locator: ElementLocator,
    _marker: PhantomData<M>,
}

impl<M: Model> EntityCommand<M> {
    pub fn new(cmd: TransportCommand, locator: ElementLocator) -> Self {
        let name = M::type_name();
        Self {
            actions: ActionCommand::new(cmd.clone()),
            cmd,
            name,
            id_key: format!("{name}_id"),
            locator,
            _marker: PhantomData,
        }
    }

    /// Generic callers pass a uniform `id`; the wire wants the
    /// resource-specific key (`task_id`, ...). The rename happens here.
    fn id_params(&self, id: &str) -> Params {
        Params::new().with(self.id_key.as_str(), id)
    }

    /// Fetch one resource. "Not found" is a value: when the located element
    /// carries no identifier the result is `Ok(None)`, never a zero-valued
    /// entity and never an error.
    pub async fn get(&self, id: &str, filter: Option<&Filter>) -> Result<Option<M>> {
        let mut params = self.id_params(id);
        if let Some(filter) = filter {
            params.set("filter", filter.to_string());
        }
        let root = self.cmd.read(&format!("get_{}", self.name), &params).await?;

        let Some(located) = (self.locator)(&root) else {
            debug!(resource = self.name, id, "entity payload not located");
            return Ok(None);
        };
        // A single get may still come back list-shaped.
        let Some(element) = as_list(Some(located)).into_iter().next() else {
            return Ok(None);
        };
        if attr(element, "id").is_none() {
            return Ok(None);
        }
        Ok(Some(M::from_element(element)))
    }

    /// Clone addresses resources by plain id regardless of type, so the
    /// id-key rename is deliberately skipped.
    pub async fn clone_entity(&self, id: &str) -> Result<ActionResult> {
        let params = Params::new()
            .with("id", id)
            .with("resource_type", self.name);
        self.actions.action("clone", &params).await
    }

    /// Fire-and-forget: success is transport-level only, no verification
    /// read follows.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.cmd
            .write(&format!("delete_{}", self.name), &self.id_params(id))
            .await?;
        Ok(())
    }

    /// Export one resource as raw file content via a single-id bulk
    /// selection.
    pub async fn export(&self, id: &str) -> Result<Vec<u8>> {
        let params = BulkSelection::ByIds(vec![id]).to_params(self.name);
        self.cmd.write_raw("bulk_export", &params).await
    }
}
