use std::marker::PhantomData;

use shared::{
    counts::CollectionCounts,
    error::{CommandError, Result},
    filter::Filter,
    model::Model,
};
use tracing::debug;

use crate::{
    aggregates::{self, AggregateRequest, Aggregates},
    bulk::BulkSelection,
    command::TransportCommand,
    entity::ElementLocator,
    params::Params,
};

/// One page of a list query. `filter` is the *server-echoed* effective
/// filter, which may differ from the requested one.
#[derive(Debug, Clone)]
pub struct CollectionList<M> {
    pub entities: Vec<M>,
    pub filter: Filter,
    pub counts: CollectionCounts,
}

/// Generic collection command: paging, bulk export/delete, aggregates.
///
/// Read-only resource listings are built with [`EntitiesCommand::read_only`];
/// their delete/export methods fail fast with `Unsupported` instead of
/// silently doing nothing.
pub struct EntitiesCommand<M: Model> {
    cmd: TransportCommand,
    name: &'static str,
    plural: &'static str,
    locator: ElementLocator,
    read_only: bool,
    _marker: PhantomData<M>,
}

impl<M: Model> EntitiesCommand<M> {
    pub fn new(cmd: TransportCommand, plural: &'static str, locator: ElementLocator) -> Self {
        Self {
            cmd,
            name: M::type_name(),
            plural,
            locator,
            read_only: false,
            _marker: PhantomData,
        }
    }

    pub fn read_only(cmd: TransportCommand, plural: &'static str, locator: ElementLocator) -> Self {
        Self {
            read_only: true,
            ..Self::new(cmd, plural, locator)
        }
    }

    fn ensure_writable(&self, operation: &'static str) -> Result<()> {
        if self.read_only {
            Err(CommandError::Unsupported {
                resource: self.name,
                operation,
            })
        } else {
            Ok(())
        }
    }

    /// Fetch one page.
    pub async fn get(&self, params: &Params) -> Result<CollectionList<M>> {
        let root = self
            .cmd
            .read(&format!("get_{}", self.plural), params)
            .await?;
        let list_root = (self.locator)(&root).ok_or_else(|| {
            CommandError::MissingElement(format!("get_{}_response", self.plural))
        })?;
        Ok(crate::parser::parse_collection_list(
            list_root, self.name, self.plural,
        ))
    }

    pub async fn get_filtered(&self, filter: &Filter) -> Result<CollectionList<M>> {
        self.get(&Params::new().with("filter", filter.to_string()))
            .await
    }

    /// Fetch the *complete* matching set in one round trip, regardless of
    /// ambient page-size defaults: no filter becomes the unrestricted
    /// sentinel, a supplied filter is forced onto its unrestricted variant.
    pub async fn get_all(&self, filter: Option<&Filter>) -> Result<CollectionList<M>> {
        let unrestricted = filter
            .map(Filter::to_unrestricted)
            .unwrap_or_else(Filter::unrestricted);
        self.get_filtered(&unrestricted).await
    }

    pub async fn export(&self, entities: &[M]) -> Result<Vec<u8>> {
        let ids: Vec<&str> = entities.iter().filter_map(Model::id).collect();
        self.export_by_ids(&ids).await
    }

    /// Explicit-id export: one selection flag per id, raw payload back.
    pub async fn export_by_ids(&self, ids: &[&str]) -> Result<Vec<u8>> {
        self.ensure_writable("export")?;
        let params = BulkSelection::ByIds(ids.to_vec()).to_params(self.name);
        self.cmd.write_raw("bulk_export", &params).await
    }

    /// Filter-driven export: the server computes the selected set itself; no
    /// id enumeration happens client-side.
    pub async fn export_by_filter(&self, filter: &Filter) -> Result<Vec<u8>> {
        self.ensure_writable("export")?;
        let params = BulkSelection::ByFilter(filter).to_params(self.name);
        self.cmd.write_raw("bulk_export", &params).await
    }

    pub async fn delete(&self, entities: &[M]) -> Result<Vec<String>> {
        let ids: Vec<&str> = entities.iter().filter_map(Model::id).collect();
        self.delete_by_ids(&ids).await
    }

    /// One batched delete request. Resolves to the input id list: partial
    /// server-side failure is not distinguishable from full success here.
    pub async fn delete_by_ids(&self, ids: &[&str]) -> Result<Vec<String>> {
        self.ensure_writable("delete")?;
        let params = BulkSelection::ByIds(ids.to_vec()).to_params(self.name);
        self.cmd.write("bulk_delete", &params).await?;
        Ok(ids.iter().map(|id| (*id).to_owned()).collect())
    }

    /// Deliberately composed as a read of the unrestricted matching set
    /// followed by a batched per-id delete. The filter-driven delete
    /// endpoint interacts unreliably with pagination, so this layer does not
    /// use it. The two round trips share no transaction: if another actor
    /// changes the matching set in between, the deleted set silently drifts
    /// from the filter's current result. Accepted race, not a defect.
    pub async fn delete_by_filter(&self, filter: &Filter) -> Result<Vec<String>> {
        self.ensure_writable("delete")?;
        let snapshot = self.get_filtered(&filter.to_unrestricted()).await?;
        debug!(
            resource = self.name,
            matched = snapshot.entities.len(),
            "deleting filter snapshot"
        );
        self.delete(&snapshot.entities).await
    }

    /// Group-by query over this collection.
    pub async fn aggregates(&self, request: &AggregateRequest) -> Result<Aggregates> {
        let params = request.to_params(self.name);
        let root = self.cmd.read("get_aggregate", &params).await?;
        aggregates::transform_aggregates(&root)
    }
}
