//! Network rules: internet exposure and dormant links.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{PortRule, Resource, ResourceKind, SecurityGroup};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "group-open-ingress",
        severity: Severity::High,
        kinds: &[ResourceKind::SecurityGroup],
        check: group_open_ingress,
    },
    Rule {
        id: "group-open-egress",
        severity: Severity::High,
        kinds: &[ResourceKind::SecurityGroup],
        check: group_open_egress,
    },
    Rule {
        id: "nacl-open",
        severity: Severity::High,
        kinds: &[ResourceKind::NetworkAclEntry],
        check: nacl_open,
    },
    Rule {
        id: "peering-inactive",
        severity: Severity::Warning,
        kinds: &[ResourceKind::PeeringConnection],
        check: peering_inactive,
    },
    Rule {
        id: "vpn-not-available",
        severity: Severity::Warning,
        kinds: &[ResourceKind::VpnConnection],
        check: vpn_not_available,
    },
    Rule {
        id: "vpn-tunnel-down",
        severity: Severity::Warning,
        kinds: &[ResourceKind::VpnConnection],
        check: vpn_tunnel_down,
    },
];

/// Human label for a port range. A half-open or absent range means the rule
/// matched every port.
fn port_label(from: Option<i64>, to: Option<i64>) -> String {
    match (from, to) {
        (Some(from), Some(to)) if from == to => format!("port {from}"),
        (Some(from), Some(to)) => format!("ports {from}-{to}"),
        _ => "all ports".to_string(),
    }
}

fn protocol_label(protocol: &str) -> String {
    if protocol == "-1" {
        "all protocols".to_string()
    } else {
        protocol.to_string()
    }
}

fn open_rule_violations(
    group: &SecurityGroup,
    rules: &[PortRule],
    direction: &str,
) -> Vec<Violation> {
    rules
        .iter()
        .filter(|rule| rule.open_to_internet())
        .map(|rule| {
            let message = format!(
                "Security group allows {direction} ({}, {}).",
                protocol_label(&rule.protocol),
                port_label(rule.port_from, rule.port_to),
            );
            let cidrs: Vec<&str> = rule
                .cidrs
                .iter()
                .filter(|cidr| crate::model::is_internet_cidr(cidr))
                .map(String::as_str)
                .collect();
            Violation::new(&group.id, message)
                .with_evidence("group_name", &group.name)
                .with_evidence("cidrs", cidrs.join(", "))
        })
        .collect()
}

fn group_open_ingress(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::SecurityGroup(group) = resource else {
        return Vec::new();
    };
    open_rule_violations(group, &group.ingress, "inbound traffic from the internet")
}

fn group_open_egress(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::SecurityGroup(group) = resource else {
        return Vec::new();
    };
    open_rule_violations(group, &group.egress, "outbound traffic to the internet")
}

fn nacl_open(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::NetworkAclEntry(entry) = resource else {
        return Vec::new();
    };
    if !entry.allow || !entry.cidrs.iter().any(|cidr| crate::model::is_internet_cidr(cidr)) {
        return Vec::new();
    }
    let direction = if entry.egress {
        "outbound traffic to the internet"
    } else {
        "inbound traffic from the internet"
    };
    let message = format!(
        "Network ACL entry allows {direction} on {}.",
        port_label(entry.port_from, entry.port_to)
    );
    vec![Violation::new(&entry.id, message)
        .with_evidence("acl_id", &entry.acl_id)
        .with_evidence("rule_number", entry.rule_number.to_string())]
}

fn peering_inactive(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::PeeringConnection(peering) = resource else {
        return Vec::new();
    };
    if peering.status.eq_ignore_ascii_case("active") {
        return Vec::new();
    }
    vec![Violation::new(
        &peering.id,
        format!("Peering connection is not active (status={}).", peering.status),
    )]
}

fn vpn_not_available(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::VpnConnection(vpn) = resource else {
        return Vec::new();
    };
    if vpn.state.eq_ignore_ascii_case("available") {
        return Vec::new();
    }
    vec![Violation::new(
        &vpn.id,
        format!("VPN connection is not available (state={}).", vpn.state),
    )]
}

fn vpn_tunnel_down(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::VpnConnection(vpn) = resource else {
        return Vec::new();
    };
    let down: Vec<&crate::model::Tunnel> =
        vpn.tunnels.iter().filter(|tunnel| !tunnel.is_up()).collect();
    if down.is_empty() {
        return Vec::new();
    }
    let ips: Vec<&str> = down
        .iter()
        .filter_map(|tunnel| tunnel.outside_ip.as_deref())
        .collect();
    let mut violation = Violation::new(
        &vpn.id,
        format!("{} of {} VPN tunnels are down.", down.len(), vpn.tunnels.len()),
    );
    if !ips.is_empty() {
        violation = violation.with_evidence("tunnels", ips.join(", "));
    }
    if let Some(address) = &vpn.gateway_address {
        violation = violation.with_evidence("gateway_address", address);
    }
    vec![violation]
}
