//! Rule evaluation.
//!
//! A rule is a pure function from one normalized resource to zero or more
//! [`Violation`]s. Rules never see the provider, never fail, and never panic
//! on any well-formed resource; everything they need beyond the resource
//! itself arrives through [`RuleContext`]. Identity (service, rule id,
//! severity) is stamped onto findings by the aggregator from the rule's
//! metadata, so a check function only describes what is wrong.

pub mod agents;
pub mod certificates;
pub mod compute;
pub mod containers;
pub mod database;
pub mod dns;
pub mod iam;
pub mod kms;
pub mod network;
pub mod storage;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub const DEFAULT_ACCESS_KEY_MAX_AGE_DAYS: i64 = 90;
pub const DEFAULT_CERTIFICATE_EXPIRY_DAYS: i64 = 30;

/// Evaluation-time inputs shared by every rule.
///
/// `now` is fixed once per run so every time-based rule sees the same
/// instant and a run is reproducible against a recorded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub now: DateTime<Utc>,
    pub access_key_max_age_days: i64,
    pub certificate_expiry_days: i64,
}

impl RuleContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            access_key_max_age_days: DEFAULT_ACCESS_KEY_MAX_AGE_DAYS,
            certificate_expiry_days: DEFAULT_CERTIFICATE_EXPIRY_DAYS,
        }
    }

    pub fn with_access_key_max_age(mut self, days: i64) -> Self {
        self.access_key_max_age_days = days;
        self
    }

    pub fn with_certificate_expiry_window(mut self, days: i64) -> Self {
        self.certificate_expiry_days = days;
        self
    }
}

/// One offense reported by a check function. The aggregator combines it
/// with the rule's metadata to build the full [`crate::findings::Finding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub resource_id: String,
    pub message: String,
    pub evidence: BTreeMap<String, String>,
}

impl Violation {
    pub fn new(resource_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            message: message.into(),
            evidence: BTreeMap::new(),
        }
    }

    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }
}

pub type CheckFn = fn(&Resource, &RuleContext) -> Vec<Violation>;

/// A registered rule: stable identity plus the check function.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable kebab-case identifier, unique across the catalog.
    pub id: &'static str,
    pub severity: Severity,
    /// Resource kinds this rule evaluates. The engine only dispatches
    /// matching resources, but check functions stay total anyway.
    pub kinds: &'static [ResourceKind],
    pub check: CheckFn,
}

impl Rule {
    pub fn applies_to(&self, kind: ResourceKind) -> bool {
        self.kinds.contains(&kind)
    }
}

static BUILTIN: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = Vec::new();
    rules.extend_from_slice(storage::RULES);
    rules.extend_from_slice(certificates::RULES);
    rules.extend_from_slice(compute::RULES);
    rules.extend_from_slice(network::RULES);
    rules.extend_from_slice(database::RULES);
    rules.extend_from_slice(kms::RULES);
    rules.extend_from_slice(iam::RULES);
    rules.extend_from_slice(dns::RULES);
    rules.extend_from_slice(agents::RULES);
    rules.extend_from_slice(containers::RULES);
    rules
});

/// The complete built-in rule catalog.
pub fn builtin_rules() -> &'static [Rule] {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AgentStatus, CertificateSummary, ComputeInstance, ContainerCluster, DbInstance,
        FeatureState, HostedZone, IamUser, KmsKey, ManagedInstance, NetworkAclEntry, PatchStatus,
        PeeringConnection, PublicAccessBlock, SecurityGroup, StorageBucket, Volume, VpnConnection,
    };
    use chrono::TimeZone;

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::StorageBucket(StorageBucket {
                name: "b".into(),
                public_grants: Vec::new(),
                public_access_block: Some(PublicAccessBlock {
                    block_public_acls: true,
                    ignore_public_acls: true,
                    block_public_policy: true,
                    restrict_public_buckets: true,
                }),
                encryption: FeatureState::Enabled,
            }),
            Resource::CertificateSummary(CertificateSummary {
                id: "c".into(),
                domain: "example.com".into(),
                expires_at: Some(Utc.with_ymd_and_hms(2028, 1, 1, 0, 0, 0).unwrap()),
                in_use: true,
            }),
            Resource::ComputeInstance(ComputeInstance {
                id: "i".into(),
                state: "running".into(),
                instance_profile: Some("p".into()),
            }),
            Resource::Volume(Volume {
                id: "v".into(),
                encryption: FeatureState::Enabled,
                attached_to: Vec::new(),
            }),
            Resource::SecurityGroup(SecurityGroup {
                id: "sg".into(),
                name: "default".into(),
                ingress: Vec::new(),
                egress: Vec::new(),
            }),
            Resource::NetworkAclEntry(NetworkAclEntry {
                id: "acl:ingress:1".into(),
                acl_id: "acl".into(),
                rule_number: 1,
                egress: false,
                allow: false,
                cidrs: Vec::new(),
                protocol: "-1".into(),
                port_from: None,
                port_to: None,
            }),
            Resource::PeeringConnection(PeeringConnection {
                id: "pcx".into(),
                status: "active".into(),
            }),
            Resource::VpnConnection(VpnConnection {
                id: "vpn".into(),
                state: "available".into(),
                gateway_address: None,
                tunnels: Vec::new(),
            }),
            Resource::DbInstance(DbInstance {
                id: "db".into(),
                engine: "postgres".into(),
                publicly_accessible: false,
                encryption: FeatureState::Enabled,
            }),
            Resource::KmsKey(KmsKey {
                id: "key".into(),
                alias: None,
                state: "Enabled".into(),
                customer_managed: true,
                symmetric: true,
                rotation: FeatureState::Enabled,
            }),
            Resource::IamUser(IamUser {
                name: "u".into(),
                mfa_devices: vec!["mfa".into()],
                access_keys: Vec::new(),
            }),
            Resource::HostedZone(HostedZone {
                id: "z".into(),
                name: "example.com.".into(),
                private: false,
                dnssec: FeatureState::Enabled,
            }),
            Resource::ManagedInstance(ManagedInstance {
                id: "mi".into(),
                agent: AgentStatus::Online,
                patching: PatchStatus::Compliant,
            }),
            Resource::ContainerCluster(ContainerCluster {
                name: "cl".into(),
                logging: FeatureState::Enabled,
                secrets_encryption: FeatureState::Enabled,
                insights: FeatureState::Enabled,
            }),
        ]
    }

    fn context() -> RuleContext {
        RuleContext::new(Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let mut ids: Vec<_> = builtin_rules().iter().map(|r| r.id).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before, "duplicate rule id in catalog");
    }

    #[test]
    fn test_every_resource_kind_has_rules() {
        for resource in sample_resources() {
            let kind = resource.kind();
            assert!(
                builtin_rules().iter().any(|rule| rule.applies_to(kind)),
                "no rule covers {kind}"
            );
        }
    }

    #[test]
    fn test_checks_are_total_over_mismatched_kinds() {
        let ctx = context();
        for rule in builtin_rules() {
            for resource in sample_resources() {
                if !rule.applies_to(resource.kind()) {
                    let violations = (rule.check)(&resource, &ctx);
                    assert!(
                        violations.is_empty(),
                        "rule {} reported on kind {}",
                        rule.id,
                        resource.kind()
                    );
                }
            }
        }
    }

    #[test]
    fn test_clean_resources_yield_no_violations() {
        let ctx = context();
        for resource in sample_resources() {
            for rule in builtin_rules() {
                if rule.applies_to(resource.kind()) {
                    let violations = (rule.check)(&resource, &ctx);
                    assert!(
                        violations.is_empty(),
                        "rule {} fired on a hardened {}",
                        rule.id,
                        resource.kind()
                    );
                }
            }
        }
    }

    #[test]
    fn test_context_builders() {
        let ctx = context()
            .with_access_key_max_age(30)
            .with_certificate_expiry_window(7);
        assert_eq!(ctx.access_key_max_age_days, 30);
        assert_eq!(ctx.certificate_expiry_days, 7);

        let ctx = context();
        assert_eq!(ctx.access_key_max_age_days, DEFAULT_ACCESS_KEY_MAX_AGE_DAYS);
        assert_eq!(ctx.certificate_expiry_days, DEFAULT_CERTIFICATE_EXPIRY_DAYS);
    }
}
