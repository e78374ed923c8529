//! Key management rules.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{KmsKey, Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "key-disabled",
        severity: Severity::Medium,
        kinds: &[ResourceKind::KmsKey],
        check: key_disabled,
    },
    Rule {
        id: "key-rotation-disabled",
        severity: Severity::Medium,
        kinds: &[ResourceKind::KmsKey],
        check: key_rotation_disabled,
    },
    Rule {
        id: "key-rotation-unknown",
        severity: Severity::Low,
        kinds: &[ResourceKind::KmsKey],
        check: key_rotation_unknown,
    },
];

/// Rotation only applies to enabled, symmetric, customer-managed keys.
/// Provider-managed keys rotate on the provider's schedule and asymmetric
/// keys cannot rotate at all.
fn rotation_applies(key: &KmsKey) -> bool {
    key.customer_managed && key.symmetric && key.is_enabled()
}

fn alias_evidence(violation: Violation, key: &KmsKey) -> Violation {
    match &key.alias {
        Some(alias) => violation.with_evidence("alias", alias),
        None => violation,
    }
}

fn key_disabled(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::KmsKey(key) = resource else {
        return Vec::new();
    };
    if key.is_enabled() {
        return Vec::new();
    }
    let violation = Violation::new(&key.id, format!("Key is not enabled (state={}).", key.state));
    vec![alias_evidence(violation, key)]
}

fn key_rotation_disabled(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::KmsKey(key) = resource else {
        return Vec::new();
    };
    if !rotation_applies(key) || !key.rotation.is_disabled() {
        return Vec::new();
    }
    let violation = Violation::new(&key.id, "Automatic key rotation is disabled.");
    vec![alias_evidence(violation, key)]
}

fn key_rotation_unknown(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::KmsKey(key) = resource else {
        return Vec::new();
    };
    if !rotation_applies(key) || !key.rotation.is_unknown() {
        return Vec::new();
    }
    let violation = Violation::new(&key.id, "Key rotation status could not be determined.");
    vec![alias_evidence(violation, key)]
}
