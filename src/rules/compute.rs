//! Compute rules: instance identity and volume encryption.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "instance-no-role",
        severity: Severity::Warning,
        kinds: &[ResourceKind::ComputeInstance],
        check: instance_no_role,
    },
    Rule {
        id: "volume-unencrypted",
        severity: Severity::Medium,
        kinds: &[ResourceKind::Volume],
        check: volume_unencrypted,
    },
    Rule {
        id: "volume-encryption-unknown",
        severity: Severity::Low,
        kinds: &[ResourceKind::Volume],
        check: volume_encryption_unknown,
    },
];

fn instance_no_role(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::ComputeInstance(instance) = resource else {
        return Vec::new();
    };
    if instance.instance_profile.is_some() {
        return Vec::new();
    }
    vec![
        Violation::new(&instance.id, "Instance has no instance profile attached.")
            .with_evidence("state", &instance.state),
    ]
}

fn volume_unencrypted(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::Volume(volume) = resource else {
        return Vec::new();
    };
    if !volume.encryption.is_disabled() {
        return Vec::new();
    }
    let mut violation = Violation::new(&volume.id, "Volume is not encrypted.");
    if !volume.attached_to.is_empty() {
        violation = violation.with_evidence("attached_to", volume.attached_to.join(", "));
    }
    vec![violation]
}

fn volume_encryption_unknown(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::Volume(volume) = resource else {
        return Vec::new();
    };
    if !volume.encryption.is_unknown() {
        return Vec::new();
    }
    vec![Violation::new(
        &volume.id,
        "Volume encryption status could not be determined.",
    )]
}
