//! DNS collector: hosted zones and their DNSSEC signing status.

use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{FeatureState, HostedZone, Resource};
use crate::provider::{CloudApi, ZoneRecord};
use crate::scope::Scope;

pub struct DnsCollector;

impl Collector for DnsCollector {
    fn service(&self) -> &'static str {
        "dns"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.hosted_zones(scope, token))?;
        debug!(zones = records.len(), "dns listing complete");
        Ok(records
            .into_iter()
            .map(|record| Resource::HostedZone(map_zone(record)))
            .collect())
    }
}

fn map_zone(record: ZoneRecord) -> HostedZone {
    let dnssec = match record.dnssec_status.as_deref() {
        Some(status) if status.eq_ignore_ascii_case("SIGNING") => FeatureState::Enabled,
        Some(status) if status.eq_ignore_ascii_case("NOT_SIGNING") => FeatureState::Disabled,
        _ => FeatureState::Unknown,
    };
    HostedZone {
        id: record.zone_id,
        name: record.name,
        private: record.private_zone,
        dnssec,
    }
}
