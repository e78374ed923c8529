//! Compute collector: instances and their block volumes.

use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{ComputeInstance, FeatureState, Resource, Volume};
use crate::provider::CloudApi;
use crate::scope::Scope;

pub struct ComputeCollector;

impl Collector for ComputeCollector {
    fn service(&self) -> &'static str {
        "compute"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let instances = drain_pages(|token| api.compute_instances(scope, token))?;
        let volumes = drain_pages(|token| api.volumes(scope, token))?;
        debug!(
            instances = instances.len(),
            volumes = volumes.len(),
            "compute listing complete"
        );

        let mut resources = Vec::with_capacity(instances.len() + volumes.len());
        resources.extend(instances.into_iter().map(|record| {
            Resource::ComputeInstance(ComputeInstance {
                id: record.instance_id,
                state: record.state,
                instance_profile: record.iam_instance_profile,
            })
        }));
        resources.extend(volumes.into_iter().map(|record| {
            Resource::Volume(Volume {
                id: record.volume_id,
                encryption: FeatureState::from_flag(record.encrypted),
                attached_to: record.attachments,
            })
        }));
        Ok(resources)
    }
}
