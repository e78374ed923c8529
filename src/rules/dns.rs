//! DNS rules: DNSSEC on public zones.
//!
//! Private zones are skipped entirely; DNSSEC has no effect on them.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "zone-no-dnssec",
        severity: Severity::Warning,
        kinds: &[ResourceKind::HostedZone],
        check: zone_no_dnssec,
    },
    Rule {
        id: "zone-dnssec-unknown",
        severity: Severity::Low,
        kinds: &[ResourceKind::HostedZone],
        check: zone_dnssec_unknown,
    },
];

fn zone_no_dnssec(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::HostedZone(zone) = resource else {
        return Vec::new();
    };
    if zone.private || !zone.dnssec.is_disabled() {
        return Vec::new();
    }
    vec![
        Violation::new(&zone.id, "Public zone does not have DNSSEC signing enabled.")
            .with_evidence("zone_name", &zone.name),
    ]
}

fn zone_dnssec_unknown(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::HostedZone(zone) = resource else {
        return Vec::new();
    };
    if zone.private || !zone.dnssec.is_unknown() {
        return Vec::new();
    }
    vec![
        Violation::new(&zone.id, "Unable to determine DNSSEC status.")
            .with_evidence("zone_name", &zone.name),
    ]
}
