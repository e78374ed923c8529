//! Container platform collector: cluster control-plane hardening flags.

use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{ContainerCluster, FeatureState, Resource};
use crate::provider::CloudApi;
use crate::scope::Scope;

pub struct ContainersCollector;

impl Collector for ContainersCollector {
    fn service(&self) -> &'static str {
        "containers"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.container_clusters(scope, token))?;
        debug!(clusters = records.len(), "containers listing complete");
        Ok(records
            .into_iter()
            .map(|record| {
                Resource::ContainerCluster(ContainerCluster {
                    name: record.name,
                    logging: FeatureState::from_flag(record.logging_enabled),
                    secrets_encryption: FeatureState::from_flag(record.secrets_encrypted),
                    insights: FeatureState::from_flag(record.insights_enabled),
                })
            })
            .collect())
    }
}
