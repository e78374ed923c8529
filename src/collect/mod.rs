//! Collectors: read-only inventory of one service each.
//!
//! A collector drains every page of the listings it needs and normalizes the
//! records into [`Resource`]s. Collection is all-or-nothing per service: any
//! provider error fails the whole collector, and a partial listing is never
//! returned as if it were complete.

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
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::error::AuditError;
use crate::model::Resource;
use crate::provider::{ApiError, CloudApi, Page};
use crate::scope::Scope;

pub use agents::AgentsCollector;
pub use certificates::CertificatesCollector;
pub use compute::ComputeCollector;
pub use containers::ContainersCollector;
pub use database::DatabaseCollector;
pub use dns::DnsCollector;
pub use iam::IamCollector;
pub use kms::KmsCollector;
pub use network::NetworkCollector;
pub use storage::StorageCollector;

/// Why a collector produced no resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("internal failure: {0}")]
    Internal(String),
}

/// Outcome of running one collector: either the complete resource listing
/// for its service, or the error that interrupted it. There is no partial
/// variant on purpose.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectorResult {
    Collected {
        service: &'static str,
        resources: Vec<Resource>,
    },
    Failed {
        service: &'static str,
        error: CollectorError,
    },
}

impl CollectorResult {
    pub fn collected(service: &'static str, resources: Vec<Resource>) -> Self {
        CollectorResult::Collected { service, resources }
    }

    pub fn failed(service: &'static str, error: CollectorError) -> Self {
        CollectorResult::Failed { service, error }
    }

    pub fn service(&self) -> &'static str {
        match self {
            CollectorResult::Collected { service, .. } => service,
            CollectorResult::Failed { service, .. } => service,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CollectorResult::Failed { .. })
    }
}

/// A read-only inventory source for one service.
pub trait Collector: Send + Sync {
    /// Service name, lowercase, unique across the registry.
    fn service(&self) -> &'static str;

    /// Lists and normalizes every resource of the service within `scope`.
    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError>;
}

/// Drains a paginated listing to completion. The first error aborts the
/// drain, so callers get either every item or none.
pub fn drain_pages<T, F>(mut fetch: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = fetch(token.as_deref())?;
        items.extend(page.items);
        match page.next_token {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

/// Registry of available collectors, keyed by service name.
pub struct Registry {
    collectors: BTreeMap<&'static str, Arc<dyn Collector>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            collectors: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in collector.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for collector in [
            Arc::new(AgentsCollector) as Arc<dyn Collector>,
            Arc::new(CertificatesCollector),
            Arc::new(ComputeCollector),
            Arc::new(ContainersCollector),
            Arc::new(DatabaseCollector),
            Arc::new(DnsCollector),
            Arc::new(IamCollector),
            Arc::new(KmsCollector),
            Arc::new(NetworkCollector),
            Arc::new(StorageCollector),
        ] {
            // Names of built-ins are unique by construction.
            let _ = registry.register(collector);
        }
        registry
    }

    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<(), AuditError> {
        let name = collector.service();
        if self.collectors.contains_key(name) {
            return Err(AuditError::DuplicateCollector { name: name.into() });
        }
        self.collectors.insert(name, collector);
        Ok(())
    }

    /// Registered service names in sorted order.
    pub fn services(&self) -> Vec<&'static str> {
        self.collectors.keys().copied().collect()
    }

    /// Resolves a requested service subset to collectors.
    ///
    /// Names are matched case-insensitively and surrounding whitespace is
    /// ignored. An empty request selects every registered collector. Unknown
    /// names are a caller error, reported before anything runs.
    pub fn select(&self, requested: &[String]) -> Result<Vec<Arc<dyn Collector>>, AuditError> {
        if requested.is_empty() {
            return Ok(self.collectors.values().cloned().collect());
        }

        let mut selected: Vec<Arc<dyn Collector>> = Vec::new();
        let mut seen: Vec<&'static str> = Vec::new();
        for name in requested {
            let normalized = name.trim().to_ascii_lowercase();
            let Some((key, collector)) = self.collectors.get_key_value(normalized.as_str()) else {
                return Err(AuditError::UnknownService {
                    name: name.trim().to_string(),
                    valid: self.services().join(", "),
                });
            };
            if !seen.contains(key) {
                seen.push(key);
                selected.push(Arc::clone(collector));
            }
        }
        Ok(selected)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
