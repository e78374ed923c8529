//! Network collector: security groups, network ACLs, peering and VPN links.
//!
//! The widest collector in the crate. It also resolves the one cross-record
//! reference rules would otherwise need API access for: the customer gateway
//! address of each VPN connection.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{
    NetworkAclEntry, PeeringConnection, PortRule, Resource, SecurityGroup, Tunnel, VpnConnection,
};
use crate::provider::{
    AclEntryRecord, CloudApi, GatewayRecord, NetworkAclRecord, PortRuleRecord,
    SecurityGroupRecord, VpnRecord,
};
use crate::scope::Scope;

pub struct NetworkCollector;

impl Collector for NetworkCollector {
    fn service(&self) -> &'static str {
        "network"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let groups = drain_pages(|token| api.security_groups(scope, token))?;
        let acls = drain_pages(|token| api.network_acls(scope, token))?;
        let peerings = drain_pages(|token| api.peering_connections(scope, token))?;
        let vpns = drain_pages(|token| api.vpn_connections(scope, token))?;
        let gateways = drain_pages(|token| api.customer_gateways(scope, token))?;
        debug!(
            security_groups = groups.len(),
            network_acls = acls.len(),
            peerings = peerings.len(),
            vpns = vpns.len(),
            "network listing complete"
        );

        let gateway_addresses: FxHashMap<&str, &GatewayRecord> = gateways
            .iter()
            .map(|gateway| (gateway.gateway_id.as_str(), gateway))
            .collect();

        let mut resources = Vec::new();
        resources.extend(
            groups
                .into_iter()
                .map(|record| Resource::SecurityGroup(map_group(record))),
        );
        for acl in &acls {
            resources.extend(
                acl.entries
                    .iter()
                    .map(|entry| Resource::NetworkAclEntry(map_acl_entry(acl, entry))),
            );
        }
        resources.extend(peerings.into_iter().map(|record| {
            Resource::PeeringConnection(PeeringConnection {
                id: record.connection_id,
                status: record.status,
            })
        }));
        resources.extend(
            vpns.into_iter()
                .map(|record| Resource::VpnConnection(map_vpn(record, &gateway_addresses))),
        );
        Ok(resources)
    }
}

fn map_group(record: SecurityGroupRecord) -> SecurityGroup {
    SecurityGroup {
        id: record.group_id,
        name: record.group_name,
        ingress: record.ingress.into_iter().map(map_port_rule).collect(),
        egress: record.egress.into_iter().map(map_port_rule).collect(),
    }
}

fn map_port_rule(record: PortRuleRecord) -> PortRule {
    let mut cidrs = record.ip_ranges;
    cidrs.extend(record.ipv6_ranges);
    PortRule {
        protocol: record.ip_protocol,
        port_from: record.from_port,
        port_to: record.to_port,
        cidrs,
    }
}

fn map_acl_entry(acl: &NetworkAclRecord, entry: &AclEntryRecord) -> NetworkAclEntry {
    let direction = if entry.egress { "egress" } else { "ingress" };
    NetworkAclEntry {
        id: format!("{}:{}:{}", acl.network_acl_id, direction, entry.rule_number),
        acl_id: acl.network_acl_id.clone(),
        rule_number: entry.rule_number,
        egress: entry.egress,
        allow: entry.rule_action.eq_ignore_ascii_case("allow"),
        cidrs: entry
            .cidr_block
            .iter()
            .chain(entry.ipv6_cidr_block.iter())
            .cloned()
            .collect(),
        protocol: entry.protocol.clone(),
        port_from: entry.from_port,
        port_to: entry.to_port,
    }
}

fn map_vpn(record: VpnRecord, gateways: &FxHashMap<&str, &GatewayRecord>) -> VpnConnection {
    let gateway_address = record
        .customer_gateway_id
        .as_deref()
        .and_then(|id| gateways.get(id))
        .and_then(|gateway| gateway.ip_address.clone());
    VpnConnection {
        id: record.connection_id,
        state: record.state,
        gateway_address,
        tunnels: record
            .tunnels
            .into_iter()
            .map(|tunnel| Tunnel {
                outside_ip: tunnel.outside_ip_address,
                status: tunnel.status,
            })
            .collect(),
    }
}
