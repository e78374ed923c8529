//! Object storage collector.

use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{
    FeatureState, GrantAudience, PublicAccessBlock, PublicGrant, Resource, StorageBucket,
};
use crate::provider::{BucketRecord, CloudApi, GrantRecord, PublicAccessBlockRecord};
use crate::scope::Scope;

pub struct StorageCollector;

impl Collector for StorageCollector {
    fn service(&self) -> &'static str {
        "storage"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.storage_buckets(scope, token))?;
        debug!(buckets = records.len(), "storage listing complete");
        Ok(records
            .into_iter()
            .map(|record| Resource::StorageBucket(map_bucket(record)))
            .collect())
    }
}

fn map_bucket(record: BucketRecord) -> StorageBucket {
    StorageBucket {
        public_grants: record.grants.iter().filter_map(map_grant).collect(),
        public_access_block: record.public_access_block.map(map_access_block),
        encryption: FeatureState::from_flag(record.encryption),
        name: record.name,
    }
}

/// Keeps only grants to the two public audiences; grants to specific
/// accounts are irrelevant to the rules and dropped here.
fn map_grant(record: &GrantRecord) -> Option<PublicGrant> {
    let audience = if record.grantee.ends_with("AllUsers") {
        GrantAudience::AllUsers
    } else if record.grantee.ends_with("AuthenticatedUsers") {
        GrantAudience::AuthenticatedUsers
    } else {
        return None;
    };
    Some(PublicGrant {
        audience,
        permission: record.permission.clone(),
    })
}

fn map_access_block(record: PublicAccessBlockRecord) -> PublicAccessBlock {
    PublicAccessBlock {
        block_public_acls: record.block_public_acls,
        ignore_public_acls: record.ignore_public_acls,
        block_public_policy: record.block_public_policy,
        restrict_public_buckets: record.restrict_public_buckets,
    }
}
