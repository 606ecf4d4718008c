//! Bulk selection: addressing many resources in one request.
//!
//! A request-time-only construct, never materialized as an entity. The two
//! modes are mutually exclusive by construction: either an explicit id set
//! (`bulk_select=1`, one `bulk_selected:<id>=1` entry per id) or a filter
//! expression the server evaluates itself (`bulk_select=0`).

use shared::filter::Filter;

use crate::params::Params;

#[derive(Debug, Clone)]
pub enum BulkSelection<'a> {
    ByIds(Vec<&'a str>),
    ByFilter(&'a Filter),
}

impl BulkSelection<'_> {
    pub fn to_params(&self, resource_type: &str) -> Params {
        let mut params = Params::new().with("resource_type", resource_type);
        match self {
            // Duplicate ids collapse: the selection key embeds the id.
            BulkSelection::ByIds(ids) => {
                params.set("bulk_select", "1");
                for id in ids {
                    params.set(format!("bulk_selected:{id}"), "1");
                }
            }
            BulkSelection::ByFilter(filter) => {
                params.set("bulk_select", "0");
                params.set("filter", filter.to_string());
            }
        }
        params
    }
}
