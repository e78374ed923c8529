//! Wire records returned by the provider client.
//!
//! These mirror the shape of provider describe/list responses, PascalCase
//! keys included, and are deliberately loose: almost every field is optional
//! or defaulted. Normalization into the strict [`crate::model`] types is the
//! collectors' job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GrantRecord {
    /// Grantee URI or group name, e.g.
    /// `http://acs.amazonaws.com/groups/global/AllUsers`.
    pub grantee: String,
    pub permission: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PublicAccessBlockRecord {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BucketRecord {
    pub name: String,
    pub grants: Vec<GrantRecord>,
    pub public_access_block: Option<PublicAccessBlockRecord>,
    /// `None` when the encryption status could not be read.
    pub encryption: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CertificateRecord {
    pub certificate_id: String,
    pub domain_name: String,
    /// RFC 3339 timestamp. Unparseable or absent dates are treated as
    /// unknown, not as errors.
    pub not_after: Option<String>,
    pub in_use_by: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct InstanceRecord {
    pub instance_id: String,
    pub state: String,
    pub iam_instance_profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct VolumeRecord {
    pub volume_id: String,
    pub encrypted: Option<bool>,
    /// Instance ids this volume is attached to.
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PortRuleRecord {
    /// Provider protocol name, `-1` meaning all protocols.
    pub ip_protocol: String,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
    pub ip_ranges: Vec<String>,
    pub ipv6_ranges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SecurityGroupRecord {
    pub group_id: String,
    pub group_name: String,
    pub ingress: Vec<PortRuleRecord>,
    pub egress: Vec<PortRuleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AclEntryRecord {
    pub rule_number: i64,
    pub egress: bool,
    /// `allow` or `deny`.
    pub rule_action: String,
    pub cidr_block: Option<String>,
    pub ipv6_cidr_block: Option<String>,
    pub protocol: String,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkAclRecord {
    pub network_acl_id: String,
    pub entries: Vec<AclEntryRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PeeringRecord {
    pub connection_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TunnelRecord {
    pub outside_ip_address: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct VpnRecord {
    pub connection_id: String,
    pub state: String,
    pub customer_gateway_id: Option<String>,
    pub tunnels: Vec<TunnelRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GatewayRecord {
    pub gateway_id: String,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DbInstanceRecord {
    pub db_instance_identifier: String,
    pub engine: String,
    pub publicly_accessible: Option<bool>,
    pub storage_encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KeyRecord {
    pub key_id: String,
    pub key_state: String,
    /// `CUSTOMER` or `AWS`.
    pub key_manager: String,
    pub key_spec: String,
    pub rotation_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AliasRecord {
    pub alias_name: String,
    pub target_key_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AccessKeyRecord {
    pub access_key_id: String,
    /// `Active` or `Inactive`.
    pub status: String,
    pub create_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UserRecord {
    pub user_name: String,
    pub mfa_devices: Vec<String>,
    pub access_keys: Vec<AccessKeyRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ZoneRecord {
    pub zone_id: String,
    pub name: String,
    pub private_zone: bool,
    /// `SIGNING`, `NOT_SIGNING`, or absent when the status was unreadable.
    pub dnssec_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ManagedInstanceRecord {
    pub instance_id: String,
    pub ping_status: String,
    pub patch_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ClusterRecord {
    pub name: String,
    pub logging_enabled: Option<bool>,
    pub secrets_encrypted: Option<bool>,
    pub insights_enabled: Option<bool>,
}
