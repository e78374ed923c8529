//! Normalized resource model.
//!
//! Collectors translate provider wire records into these types so that rules
//! never see raw API responses. The set of resource kinds is closed: adding a
//! kind means adding a variant here, a collector that produces it, and rules
//! that evaluate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant for [`Resource`], used to route resources to the rules that
/// know how to evaluate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    StorageBucket,
    CertificateSummary,
    ComputeInstance,
    Volume,
    SecurityGroup,
    NetworkAclEntry,
    PeeringConnection,
    VpnConnection,
    DbInstance,
    KmsKey,
    IamUser,
    HostedZone,
    ManagedInstance,
    ContainerCluster,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::StorageBucket => "storage-bucket",
            ResourceKind::CertificateSummary => "certificate",
            ResourceKind::ComputeInstance => "compute-instance",
            ResourceKind::Volume => "volume",
            ResourceKind::SecurityGroup => "security-group",
            ResourceKind::NetworkAclEntry => "network-acl-entry",
            ResourceKind::PeeringConnection => "peering-connection",
            ResourceKind::VpnConnection => "vpn-connection",
            ResourceKind::DbInstance => "db-instance",
            ResourceKind::KmsKey => "kms-key",
            ResourceKind::IamUser => "iam-user",
            ResourceKind::HostedZone => "hosted-zone",
            ResourceKind::ManagedInstance => "managed-instance",
            ResourceKind::ContainerCluster => "container-cluster",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state for security features whose status may be unreportable.
///
/// `Unknown` is distinct from `Disabled` on purpose: rules flag the two
/// differently, so a permission gap during collection never masquerades as a
/// hardened (or broken) configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureState {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

impl FeatureState {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => FeatureState::Enabled,
            Some(false) => FeatureState::Disabled,
            None => FeatureState::Unknown,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, FeatureState::Enabled)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, FeatureState::Disabled)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FeatureState::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureState::Enabled => "enabled",
            FeatureState::Disabled => "disabled",
            FeatureState::Unknown => "unknown",
        }
    }
}

/// Who an object storage ACL grant opens the bucket to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantAudience {
    /// Anyone on the internet.
    AllUsers,
    /// Any authenticated account of the provider, which is barely narrower.
    AuthenticatedUsers,
}

/// An ACL grant to a public audience. Narrow grants to specific accounts are
/// dropped during collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicGrant {
    pub audience: GrantAudience,
    pub permission: String,
}

/// Account- or bucket-level public access block configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// True only when all four guards are on.
    pub fn fully_enabled(&self) -> bool {
        self.block_public_acls
            && self.ignore_public_acls
            && self.block_public_policy
            && self.restrict_public_buckets
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBucket {
    pub name: String,
    pub public_grants: Vec<PublicGrant>,
    pub public_access_block: Option<PublicAccessBlock>,
    pub encryption: FeatureState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub id: String,
    pub domain: String,
    /// `None` when the provider did not report an expiry date.
    pub expires_at: Option<DateTime<Utc>>,
    pub in_use: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeInstance {
    pub id: String,
    pub state: String,
    pub instance_profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub encryption: FeatureState,
    /// Instance ids this volume is attached to, resolved during collection.
    pub attached_to: Vec<String>,
}

/// One ingress or egress permission of a security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRule {
    pub protocol: String,
    pub port_from: Option<i64>,
    pub port_to: Option<i64>,
    pub cidrs: Vec<String>,
}

impl PortRule {
    /// Whether any of the rule's ranges is an internet-wide CIDR.
    pub fn open_to_internet(&self) -> bool {
        self.cidrs.iter().any(|cidr| is_internet_cidr(cidr))
    }
}

/// CIDRs that mean "everyone".
pub fn is_internet_cidr(cidr: &str) -> bool {
    cidr == "0.0.0.0/0" || cidr == "::/0"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    pub ingress: Vec<PortRule>,
    pub egress: Vec<PortRule>,
}

/// A single network ACL entry, exploded out of its parent ACL so each entry
/// carries its own stable id of the form `<acl>:<ingress|egress>:<number>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAclEntry {
    pub id: String,
    pub acl_id: String,
    pub rule_number: i64,
    pub egress: bool,
    pub allow: bool,
    pub cidrs: Vec<String>,
    pub protocol: String,
    pub port_from: Option<i64>,
    pub port_to: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeeringConnection {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunnel {
    pub outside_ip: Option<String>,
    pub status: String,
}

impl Tunnel {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("up")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnConnection {
    pub id: String,
    pub state: String,
    /// Address of the customer gateway, joined in during collection.
    pub gateway_address: Option<String>,
    pub tunnels: Vec<Tunnel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInstance {
    pub id: String,
    pub engine: String,
    pub publicly_accessible: bool,
    pub encryption: FeatureState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmsKey {
    pub id: String,
    /// First alias pointing at this key, joined in during collection.
    pub alias: Option<String>,
    pub state: String,
    pub customer_managed: bool,
    pub symmetric: bool,
    pub rotation: FeatureState,
}

impl KmsKey {
    pub fn is_enabled(&self) -> bool {
        self.state.eq_ignore_ascii_case("enabled")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    pub id: String,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamUser {
    pub name: String,
    /// Serial numbers of registered MFA devices. Empty means no MFA.
    pub mfa_devices: Vec<String>,
    pub access_keys: Vec<AccessKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub id: String,
    pub name: String,
    pub private: bool,
    pub dnssec: FeatureState,
}

/// Connectivity of the management agent on a managed instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Online => "online",
            AgentStatus::Offline => "offline",
            AgentStatus::Unknown => "unknown",
        }
    }
}

/// Patch compliance of a managed instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchStatus {
    Compliant,
    NonCompliant,
    #[default]
    Unknown,
}

impl PatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchStatus::Compliant => "compliant",
            PatchStatus::NonCompliant => "non-compliant",
            PatchStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedInstance {
    pub id: String,
    pub agent: AgentStatus,
    pub patching: PatchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCluster {
    pub name: String,
    pub logging: FeatureState,
    pub secrets_encryption: FeatureState,
    pub insights: FeatureState,
}

/// A normalized cloud resource. This enum is the entire vocabulary shared
/// between collectors and rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    StorageBucket(StorageBucket),
    CertificateSummary(CertificateSummary),
    ComputeInstance(ComputeInstance),
    Volume(Volume),
    SecurityGroup(SecurityGroup),
    NetworkAclEntry(NetworkAclEntry),
    PeeringConnection(PeeringConnection),
    VpnConnection(VpnConnection),
    DbInstance(DbInstance),
    KmsKey(KmsKey),
    IamUser(IamUser),
    HostedZone(HostedZone),
    ManagedInstance(ManagedInstance),
    ContainerCluster(ContainerCluster),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::StorageBucket(_) => ResourceKind::StorageBucket,
            Resource::CertificateSummary(_) => ResourceKind::CertificateSummary,
            Resource::ComputeInstance(_) => ResourceKind::ComputeInstance,
            Resource::Volume(_) => ResourceKind::Volume,
            Resource::SecurityGroup(_) => ResourceKind::SecurityGroup,
            Resource::NetworkAclEntry(_) => ResourceKind::NetworkAclEntry,
            Resource::PeeringConnection(_) => ResourceKind::PeeringConnection,
            Resource::VpnConnection(_) => ResourceKind::VpnConnection,
            Resource::DbInstance(_) => ResourceKind::DbInstance,
            Resource::KmsKey(_) => ResourceKind::KmsKey,
            Resource::IamUser(_) => ResourceKind::IamUser,
            Resource::HostedZone(_) => ResourceKind::HostedZone,
            Resource::ManagedInstance(_) => ResourceKind::ManagedInstance,
            Resource::ContainerCluster(_) => ResourceKind::ContainerCluster,
        }
    }

    /// Identifier of the resource within its service.
    pub fn id(&self) -> &str {
        match self {
            Resource::StorageBucket(r) => &r.name,
            Resource::CertificateSummary(r) => &r.id,
            Resource::ComputeInstance(r) => &r.id,
            Resource::Volume(r) => &r.id,
            Resource::SecurityGroup(r) => &r.id,
            Resource::NetworkAclEntry(r) => &r.id,
            Resource::PeeringConnection(r) => &r.id,
            Resource::VpnConnection(r) => &r.id,
            Resource::DbInstance(r) => &r.id,
            Resource::KmsKey(r) => &r.id,
            Resource::IamUser(r) => &r.name,
            Resource::HostedZone(r) => &r.id,
            Resource::ManagedInstance(r) => &r.id,
            Resource::ContainerCluster(r) => &r.name,
        }
    }
}
