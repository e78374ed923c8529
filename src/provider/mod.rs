//! Provider client seam.
//!
//! [`CloudApi`] is the boundary between the audit engine and whatever
//! actually talks to the cloud. Collectors depend on this trait only, so the
//! engine can run against a live client adapter or against a recorded
//! account snapshot without changing. The crate ships one implementation,
//! [`SnapshotApi`], which replays a JSON account export.

pub mod records;
pub mod snapshot;

use thiserror::Error;

use crate::scope::Scope;

pub use records::{
    AccessKeyRecord, AclEntryRecord, AliasRecord, BucketRecord, CertificateRecord, ClusterRecord,
    DbInstanceRecord, GatewayRecord, GrantRecord, InstanceRecord, KeyRecord,
    ManagedInstanceRecord, NetworkAclRecord, PeeringRecord, PortRuleRecord,
    PublicAccessBlockRecord, SecurityGroupRecord, TunnelRecord, UserRecord, VolumeRecord,
    VpnRecord, ZoneRecord,
};
pub use snapshot::{Snapshot, SnapshotApi, SnapshotError};

/// Environmental failure reported by the provider client.
///
/// These are expected in production accounts (permission gaps, throttling,
/// regional outages) and are never allowed to abort a run; the collector
/// that hit one fails as a unit instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("request throttled: {0}")]
    Throttled(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One page of a listing plus the token for the next one, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A page that ends the listing.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// A page with more to fetch after it.
    pub fn partial(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::last(Vec::new())
    }
}

/// Paginated read-only listing surface of the provider.
///
/// Every method lists one record family. Implementations must be honest
/// about failure: returning `Ok` with silently missing items is the one
/// thing the engine cannot defend against.
pub trait CloudApi: Send + Sync {
    fn storage_buckets(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<BucketRecord>, ApiError>;

    fn certificates(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<CertificateRecord>, ApiError>;

    fn compute_instances(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<InstanceRecord>, ApiError>;

    fn volumes(&self, scope: &Scope, token: Option<&str>) -> Result<Page<VolumeRecord>, ApiError>;

    fn security_groups(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<SecurityGroupRecord>, ApiError>;

    fn network_acls(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<NetworkAclRecord>, ApiError>;

    fn peering_connections(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<PeeringRecord>, ApiError>;

    fn vpn_connections(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<VpnRecord>, ApiError>;

    fn customer_gateways(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<GatewayRecord>, ApiError>;

    fn db_instances(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<DbInstanceRecord>, ApiError>;

    fn kms_keys(&self, scope: &Scope, token: Option<&str>) -> Result<Page<KeyRecord>, ApiError>;

    fn kms_aliases(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<AliasRecord>, ApiError>;

    fn iam_users(&self, scope: &Scope, token: Option<&str>) -> Result<Page<UserRecord>, ApiError>;

    fn hosted_zones(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<ZoneRecord>, ApiError>;

    fn managed_instances(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<ManagedInstanceRecord>, ApiError>;

    fn container_clusters(&self, scope: &Scope, token: Option<&str>)
        -> Result<Page<ClusterRecord>, ApiError>;
}
