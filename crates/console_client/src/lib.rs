//! Generic resource command layer for the scanning console.
//!
//! Translates the backend's irregular, legacy-document wire protocol into
//! typed entities, paginated collections, bulk multi-select operations, and
//! group-by aggregations. UI data loading sits above this crate; the
//! transport (connectivity, retries, timeouts) sits below it.

pub mod action;
pub mod aggregates;
pub mod bulk;
pub mod command;
pub mod entities;
pub mod entity;
pub mod factory;
pub mod params;
pub mod parser;
pub mod transport;

pub use action::{ActionCommand, ActionResult};
pub use aggregates::{
    AggregateGroup, AggregateMode, AggregateRequest, AggregateStats, Aggregates, SortSpec,
    SortStat,
};
pub use bulk::BulkSelection;
pub use command::TransportCommand;
pub use entities::{CollectionList, EntitiesCommand};
pub use entity::{element_path, ElementLocator, EntityCommand};
pub use factory::ConsoleCommands;
pub use params::Params;
pub use transport::{HttpTransport, MissingTransport, Transport};

#[cfg(test)]
mod tests;
