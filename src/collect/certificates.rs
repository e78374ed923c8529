//! TLS certificate collector.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{CertificateSummary, Resource};
use crate::provider::{CertificateRecord, CloudApi};
use crate::scope::Scope;

pub struct CertificatesCollector;

impl Collector for CertificatesCollector {
    fn service(&self) -> &'static str {
        "certificates"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.certificates(scope, token))?;
        debug!(certificates = records.len(), "certificate listing complete");
        Ok(records
            .into_iter()
            .map(|record| Resource::CertificateSummary(map_certificate(record)))
            .collect())
    }
}

fn map_certificate(record: CertificateRecord) -> CertificateSummary {
    CertificateSummary {
        id: record.certificate_id,
        domain: record.domain_name,
        expires_at: record.not_after.as_deref().and_then(parse_timestamp),
        in_use: !record.in_use_by.is_empty(),
    }
}

/// An unparseable expiry date degrades to "unknown" rather than failing the
/// collector; the expiry-unknown rule surfaces it from there.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
