pub mod counts;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod model;

pub use counts::CollectionCounts;
pub use error::{CommandError, Result, TransportError};
pub use filter::{Filter, SortOrder};
pub use model::{EntityData, Model};
