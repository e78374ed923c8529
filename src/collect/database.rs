//! Managed database collector.

use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{DbInstance, FeatureState, Resource};
use crate::provider::CloudApi;
use crate::scope::Scope;

pub struct DatabaseCollector;

impl Collector for DatabaseCollector {
    fn service(&self) -> &'static str {
        "database"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.db_instances(scope, token))?;
        debug!(instances = records.len(), "database listing complete");
        Ok(records
            .into_iter()
            .map(|record| {
                Resource::DbInstance(DbInstance {
                    id: record.db_instance_identifier,
                    engine: record.engine,
                    publicly_accessible: record.publicly_accessible.unwrap_or(false),
                    encryption: FeatureState::from_flag(record.storage_encrypted),
                })
            })
            .collect())
    }
}
