//! Snapshot-backed provider client.
//!
//! A snapshot is a JSON export of one account's configuration, grouped into
//! per-service sections. A section is either the recorded listing or an
//! `{"Error": "..."}` marker capturing that the export itself could not read
//! that service; [`SnapshotApi`] replays the marker as the corresponding
//! [`ApiError`], so outages reproduce exactly the way they happened.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::records::{
    AliasRecord, BucketRecord, CertificateRecord, ClusterRecord, DbInstanceRecord, GatewayRecord,
    InstanceRecord, KeyRecord, ManagedInstanceRecord, NetworkAclRecord, PeeringRecord,
    SecurityGroupRecord, UserRecord, VolumeRecord, VpnRecord, ZoneRecord,
};
use super::{ApiError, CloudApi, Page};
use crate::scope::Scope;

/// Listing page size used when replaying a snapshot.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file")]
    Read(#[from] std::io::Error),

    #[error("failed to parse snapshot JSON")]
    Parse(#[from] serde_json::Error),
}

/// Error marker recorded in place of a section's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFailure {
    #[serde(rename = "Error")]
    pub error: String,
}

/// A snapshot section: either recorded data or the error that prevented
/// recording it.
///
/// `Failed` must stay the first variant. Deserialization is untagged and an
/// `{"Error": ...}` object would also satisfy the defaulted data structs, so
/// variant order is what keeps error markers from parsing as empty sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionState<T> {
    Failed(SectionFailure),
    Ready(T),
}

impl<T: Default> Default for SectionState<T> {
    fn default() -> Self {
        SectionState::Ready(T::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StorageSection {
    pub buckets: Vec<BucketRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CertificatesSection {
    pub certificates: Vec<CertificateRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ComputeSection {
    pub instances: Vec<InstanceRecord>,
    pub volumes: Vec<VolumeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkSection {
    pub security_groups: Vec<SecurityGroupRecord>,
    pub network_acls: Vec<NetworkAclRecord>,
    pub peering_connections: Vec<PeeringRecord>,
    pub vpn_connections: Vec<VpnRecord>,
    pub customer_gateways: Vec<GatewayRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DatabaseSection {
    pub db_instances: Vec<DbInstanceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KmsSection {
    pub keys: Vec<KeyRecord>,
    pub aliases: Vec<AliasRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct IamSection {
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DnsSection {
    pub hosted_zones: Vec<ZoneRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AgentsSection {
    pub managed_instances: Vec<ManagedInstanceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ContainersSection {
    pub clusters: Vec<ClusterRecord>,
}

/// Root document of an account export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Snapshot {
    pub account: Option<String>,
    pub captured_at: Option<String>,
    pub storage: SectionState<StorageSection>,
    pub certificates: SectionState<CertificatesSection>,
    pub compute: SectionState<ComputeSection>,
    pub network: SectionState<NetworkSection>,
    pub database: SectionState<DatabaseSection>,
    pub kms: SectionState<KmsSection>,
    pub iam: SectionState<IamSection>,
    pub dns: SectionState<DnsSection>,
    pub agents: SectionState<AgentsSection>,
    pub containers: SectionState<ContainersSection>,
}

/// [`CloudApi`] implementation that serves listings out of a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotApi {
    snapshot: Snapshot,
    page_size: usize,
}

impl SnapshotApi {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        Ok(Self::new(serde_json::from_value(value)?))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn section<'a, T>(&self, state: &'a SectionState<T>) -> Result<&'a T, ApiError> {
        match state {
            SectionState::Ready(section) => Ok(section),
            SectionState::Failed(failure) => Err(classify_failure(&failure.error)),
        }
    }

    fn page_of<T: Clone>(&self, items: &[T], token: Option<&str>) -> Result<Page<T>, ApiError> {
        let start = match token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .ok()
                .filter(|start| *start <= items.len())
                .ok_or_else(|| ApiError::Malformed(format!("invalid page token '{token}'")))?,
        };
        let end = items.len().min(start + self.page_size);
        let next_token = (end < items.len()).then(|| end.to_string());
        Ok(Page {
            items: items[start..end].to_vec(),
            next_token,
        })
    }
}

/// Maps a recorded error string onto the [`ApiError`] it stood for. Markers
/// follow the provider convention of a leading error code, `Code: detail`.
fn classify_failure(message: &str) -> ApiError {
    let code = message.split(':').next().unwrap_or("").trim();
    match code {
        "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation" => {
            ApiError::AccessDenied(message.to_string())
        }
        "Throttling" | "ThrottlingException" | "TooManyRequestsException" => {
            ApiError::Throttled(message.to_string())
        }
        _ => ApiError::Unavailable(message.to_string()),
    }
}

impl CloudApi for SnapshotApi {
    fn storage_buckets(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<BucketRecord>, ApiError> {
        let section = self.section(&self.snapshot.storage)?;
        self.page_of(&section.buckets, token)
    }

    fn certificates(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<CertificateRecord>, ApiError> {
        let section = self.section(&self.snapshot.certificates)?;
        self.page_of(&section.certificates, token)
    }

    fn compute_instances(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<InstanceRecord>, ApiError> {
        let section = self.section(&self.snapshot.compute)?;
        self.page_of(&section.instances, token)
    }

    fn volumes(&self, _scope: &Scope, token: Option<&str>) -> Result<Page<VolumeRecord>, ApiError> {
        let section = self.section(&self.snapshot.compute)?;
        self.page_of(&section.volumes, token)
    }

    fn security_groups(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<SecurityGroupRecord>, ApiError> {
        let section = self.section(&self.snapshot.network)?;
        self.page_of(&section.security_groups, token)
    }

    fn network_acls(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<NetworkAclRecord>, ApiError> {
        let section = self.section(&self.snapshot.network)?;
        self.page_of(&section.network_acls, token)
    }

    fn peering_connections(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<PeeringRecord>, ApiError> {
        let section = self.section(&self.snapshot.network)?;
        self.page_of(&section.peering_connections, token)
    }

    fn vpn_connections(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<VpnRecord>, ApiError> {
        let section = self.section(&self.snapshot.network)?;
        self.page_of(&section.vpn_connections, token)
    }

    fn customer_gateways(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<GatewayRecord>, ApiError> {
        let section = self.section(&self.snapshot.network)?;
        self.page_of(&section.customer_gateways, token)
    }

    fn db_instances(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<DbInstanceRecord>, ApiError> {
        let section = self.section(&self.snapshot.database)?;
        self.page_of(&section.db_instances, token)
    }

    fn kms_keys(&self, _scope: &Scope, token: Option<&str>) -> Result<Page<KeyRecord>, ApiError> {
        let section = self.section(&self.snapshot.kms)?;
        self.page_of(&section.keys, token)
    }

    fn kms_aliases(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<AliasRecord>, ApiError> {
        let section = self.section(&self.snapshot.kms)?;
        self.page_of(&section.aliases, token)
    }

    fn iam_users(&self, _scope: &Scope, token: Option<&str>) -> Result<Page<UserRecord>, ApiError> {
        let section = self.section(&self.snapshot.iam)?;
        self.page_of(&section.users, token)
    }

    fn hosted_zones(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<ZoneRecord>, ApiError> {
        let section = self.section(&self.snapshot.dns)?;
        self.page_of(&section.hosted_zones, token)
    }

    fn managed_instances(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<ManagedInstanceRecord>, ApiError> {
        let section = self.section(&self.snapshot.agents)?;
        self.page_of(&section.managed_instances, token)
    }

    fn container_clusters(
        &self,
        _scope: &Scope,
        token: Option<&str>,
    ) -> Result<Page<ClusterRecord>, ApiError> {
        let section = self.section(&self.snapshot.containers)?;
        self.page_of(&section.clusters, token)
    }
}
