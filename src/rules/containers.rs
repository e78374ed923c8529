//! Container platform rules: cluster control-plane hardening.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "cluster-logging-disabled",
        severity: Severity::Medium,
        kinds: &[ResourceKind::ContainerCluster],
        check: cluster_logging_disabled,
    },
    Rule {
        id: "cluster-secrets-unencrypted",
        severity: Severity::Medium,
        kinds: &[ResourceKind::ContainerCluster],
        check: cluster_secrets_unencrypted,
    },
    Rule {
        id: "cluster-no-insights",
        severity: Severity::Low,
        kinds: &[ResourceKind::ContainerCluster],
        check: cluster_no_insights,
    },
];

fn cluster_logging_disabled(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::ContainerCluster(cluster) = resource else {
        return Vec::new();
    };
    if !cluster.logging.is_disabled() {
        return Vec::new();
    }
    vec![Violation::new(
        &cluster.name,
        "Control plane logging is disabled.",
    )]
}

fn cluster_secrets_unencrypted(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::ContainerCluster(cluster) = resource else {
        return Vec::new();
    };
    if !cluster.secrets_encryption.is_disabled() {
        return Vec::new();
    }
    vec![Violation::new(
        &cluster.name,
        "Secrets are not encrypted with a managed key.",
    )]
}

fn cluster_no_insights(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::ContainerCluster(cluster) = resource else {
        return Vec::new();
    };
    if !cluster.insights.is_disabled() {
        return Vec::new();
    }
    vec![Violation::new(
        &cluster.name,
        "Container monitoring is not enabled.",
    )]
}
