//! Systems management rules: agent reachability and patch compliance.
//!
//! Unknown agent or patch state stays quiet here. Both statuses come from
//! the same listing, so a gap is a data gap of the whole listing, not a
//! per-instance security signal.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{AgentStatus, PatchStatus, Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "agent-offline",
        severity: Severity::Medium,
        kinds: &[ResourceKind::ManagedInstance],
        check: agent_offline,
    },
    Rule {
        id: "agent-unpatched",
        severity: Severity::Medium,
        kinds: &[ResourceKind::ManagedInstance],
        check: agent_unpatched,
    },
];

fn agent_offline(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::ManagedInstance(instance) = resource else {
        return Vec::new();
    };
    if instance.agent != AgentStatus::Offline {
        return Vec::new();
    }
    vec![Violation::new(
        &instance.id,
        "Management agent is not connected.",
    )]
}

fn agent_unpatched(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::ManagedInstance(instance) = resource else {
        return Vec::new();
    };
    if instance.patching != PatchStatus::NonCompliant {
        return Vec::new();
    }
    vec![Violation::new(
        &instance.id,
        "Instance is missing required patches.",
    )]
}
