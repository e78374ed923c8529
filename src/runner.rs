//! Audit runner: bounded fan-out of collectors, fan-in of results.
//!
//! Collectors are independent and run concurrently up to a configured limit,
//! each under an optional wall-clock deadline measured from the start of the
//! run. A collector that misses the deadline, panics, or fails its listing
//! turns into a `Failed` result; it never takes the run down with it, and
//! results that already completed are always kept.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::collect::{Collector, CollectorError, CollectorResult, Registry};
use crate::error::AuditError;
use crate::findings::Report;
use crate::provider::CloudApi;
use crate::rules::{builtin_rules, Rule, RuleContext};
use crate::scope::Scope;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Concurrency and deadline settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum number of collectors fetching at the same time.
    pub concurrency: usize,
    /// Wall-clock budget for the whole run, measured from its start.
    pub deadline: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }
}

impl RunOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Drives collectors for a service selection and aggregates their results.
pub struct AuditRunner {
    registry: Registry,
    rules: Vec<Rule>,
    options: RunOptions,
    access_key_max_age_days: i64,
    certificate_expiry_days: i64,
}

impl AuditRunner {
    /// Runner with the built-in collectors, the built-in rule catalog and
    /// default options.
    pub fn new() -> Self {
        let defaults = RuleContext::new(Utc::now());
        Self {
            registry: Registry::builtin(),
            rules: builtin_rules().to_vec(),
            options: RunOptions::default(),
            access_key_max_age_days: defaults.access_key_max_age_days,
            certificate_expiry_days: defaults.certificate_expiry_days,
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_thresholds(
        mut self,
        access_key_max_age_days: i64,
        certificate_expiry_days: i64,
    ) -> Self {
        self.access_key_max_age_days = access_key_max_age_days;
        self.certificate_expiry_days = certificate_expiry_days;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluation context for a run starting now.
    pub fn context(&self) -> RuleContext {
        RuleContext::new(Utc::now())
            .with_access_key_max_age(self.access_key_max_age_days)
            .with_certificate_expiry_window(self.certificate_expiry_days)
    }

    /// Runs the selected collectors and returns one result per collector,
    /// in selection order.
    ///
    /// The only errors returned here are selection errors, raised before any
    /// collector starts. Once collection begins, every failure is folded
    /// into the corresponding [`CollectorResult`].
    pub async fn collect_all(
        &self,
        services: &[String],
        scope: &Scope,
        api: Arc<dyn CloudApi>,
    ) -> Result<Vec<CollectorResult>, AuditError> {
        let selected = self.registry.select(services)?;
        let concurrency = self.options.concurrency.max(1);
        let deadline = self
            .options
            .deadline
            .map(|limit| (Instant::now() + limit, limit));
        let semaphore = Arc::new(Semaphore::new(concurrency));
        info!(
            collectors = selected.len(),
            concurrency,
            deadline_secs = self.options.deadline.map(|d| d.as_secs()),
            "starting collection"
        );

        let mut handles = Vec::with_capacity(selected.len());
        for collector in selected {
            let service = collector.service();
            let handle = tokio::spawn(collect_one(
                collector,
                Arc::clone(&api),
                scope.clone(),
                Arc::clone(&semaphore),
                deadline,
            ));
            handles.push((service, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (service, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => CollectorResult::failed(
                    service,
                    CollectorError::Internal(join_error.to_string()),
                ),
            };
            results.push(result);
        }
        Ok(results)
    }

    /// Full audit: collect, evaluate, aggregate.
    pub async fn run(
        &self,
        services: &[String],
        scope: &Scope,
        api: Arc<dyn CloudApi>,
    ) -> Result<Report, AuditError> {
        let results = self.collect_all(services, scope, api).await?;
        Ok(aggregate(&results, &self.rules, &self.context()))
    }
}

impl Default for AuditRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// One collector's lifecycle: wait for a pool permit, run the blocking
/// collection, classify the outcome.
///
/// The deadline clock covers the permit wait too; a collector stuck behind
/// a saturated pool when time runs out fails like one stuck mid-listing.
async fn collect_one(
    collector: Arc<dyn Collector>,
    api: Arc<dyn CloudApi>,
    scope: Scope,
    semaphore: Arc<Semaphore>,
    deadline: Option<(Instant, Duration)>,
) -> CollectorResult {
    let service = collector.service();
    let work = async move {
        let _permit = match semaphore.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                return CollectorResult::failed(
                    service,
                    CollectorError::Internal("collector pool closed".into()),
                )
            }
        };
        debug!(service, "collector started");
        let outcome =
            tokio::task::spawn_blocking(move || collector.collect(api.as_ref(), &scope)).await;
        match outcome {
            Ok(Ok(resources)) => {
                debug!(service, resources = resources.len(), "collector finished");
                CollectorResult::collected(service, resources)
            }
            Ok(Err(error)) => {
                warn!(service, %error, "collector failed");
                CollectorResult::failed(service, error)
            }
            Err(join_error) => {
                warn!(service, %join_error, "collector panicked");
                CollectorResult::failed(service, CollectorError::Internal(join_error.to_string()))
            }
        }
    };

    match deadline {
        Some((at, limit)) => match timeout_at(at, work).await {
            Ok(result) => result,
            Err(_) => {
                let limit_ms = limit.as_millis() as u64;
                warn!(service, limit_ms, "collector missed the deadline");
                CollectorResult::failed(service, CollectorError::DeadlineExceeded(limit))
            }
        },
        None => work.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Severity;
    use crate::model::Resource;
    use crate::provider::{ApiError, Page, SnapshotApi};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapshot_api(value: serde_json::Value) -> Arc<dyn CloudApi> {
        Arc::new(SnapshotApi::from_value(value).unwrap())
    }

    #[tokio::test]
    async fn test_run_over_healthy_snapshot() {
        let api = snapshot_api(json!({
            "Iam": {"Users": [{"UserName": "alice", "MfaDevices": ["arn:mfa"]}]},
            "Storage": {"Buckets": [{
                "Name": "logs",
                "PublicAccessBlock": {
                    "BlockPublicAcls": true, "IgnorePublicAcls": true,
                    "BlockPublicPolicy": true, "RestrictPublicBuckets": true
                },
                "Encryption": true
            }]}
        }));
        let runner = AuditRunner::new();
        let report = runner.run(&[], &Scope::new(), api).await.unwrap();
        assert!(report.findings.is_empty());
        assert_eq!(report.collector_errors, 0);
        assert!(report.passed());
    }

    #[tokio::test]
    async fn test_collect_all_returns_selection_order() {
        let api = snapshot_api(json!({}));
        let runner = AuditRunner::new();
        let results = runner
            .collect_all(&["storage".into(), "iam".into()], &Scope::new(), api)
            .await
            .unwrap();
        let services: Vec<_> = results.iter().map(|r| r.service()).collect();
        assert_eq!(services, vec!["storage", "iam"]);
    }

    #[tokio::test]
    async fn test_unknown_service_fails_before_collection() {
        let api = snapshot_api(json!({}));
        let runner = AuditRunner::new();
        let err = runner
            .run(&["s3".into()], &Scope::new(), api)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::UnknownService { .. }));
    }

    #[tokio::test]
    async fn test_one_outage_leaves_other_results_intact() {
        let api = snapshot_api(json!({
            "Database": {"Error": "AccessDenied: rds:DescribeDBInstances"},
            "Iam": {"Users": [{"UserName": "alice"}]}
        }));
        let runner = AuditRunner::new();
        let report = runner.run(&[], &Scope::new(), api).await.unwrap();

        assert_eq!(report.collector_errors, 1);
        let errors: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].service, "database");
        assert!(report.findings.iter().any(|f| f.rule_id == "iam-no-mfa"));
    }

    struct CountingCollector {
        name: &'static str,
        current: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Collector for CountingCollector {
        fn service(&self) -> &'static str {
            self.name
        }

        fn collect(
            &self,
            _api: &dyn CloudApi,
            _scope: &Scope,
        ) -> Result<Vec<Resource>, CollectorError> {
            let running = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(30));
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrency_limit_is_respected() {
        const NAMES: [&str; 6] = ["c0", "c1", "c2", "c3", "c4", "c5"];
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut registry = Registry::empty();
        for name in NAMES {
            registry
                .register(Arc::new(CountingCollector {
                    name,
                    current: Arc::clone(&current),
                    peak: Arc::clone(&peak),
                }))
                .unwrap();
        }

        let runner = AuditRunner::new()
            .with_registry(registry)
            .with_options(RunOptions::default().with_concurrency(2));
        let results = runner
            .collect_all(&[], &Scope::new(), snapshot_api(json!({})))
            .await
            .unwrap();

        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| !r.is_failed()));
        assert!(
            peak.load(Ordering::SeqCst) <= 2,
            "peak concurrency {} exceeded the limit",
            peak.load(Ordering::SeqCst)
        );
    }

    struct PanickyCollector;

    impl Collector for PanickyCollector {
        fn service(&self) -> &'static str {
            "explosive"
        }

        fn collect(
            &self,
            _api: &dyn CloudApi,
            _scope: &Scope,
        ) -> Result<Vec<Resource>, CollectorError> {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn test_panicking_collector_is_contained() {
        let mut registry = Registry::empty();
        registry.register(Arc::new(PanickyCollector)).unwrap();
        registry.register(Arc::new(crate::collect::IamCollector)).unwrap();

        let api = snapshot_api(json!({"Iam": {"Users": [{"UserName": "alice"}]}}));
        let runner = AuditRunner::new().with_registry(registry);
        let report = runner.run(&[], &Scope::new(), api).await.unwrap();

        assert_eq!(report.collector_errors, 1);
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == Severity::Error && f.service == "explosive"));
        assert!(report.findings.iter().any(|f| f.rule_id == "iam-no-mfa"));
    }

    /// Provider whose storage listing blocks long enough to blow any short
    /// deadline; every other listing is instant and empty.
    struct SlowStorageApi;

    macro_rules! empty_listing {
        ($name:ident, $record:ty) => {
            fn $name(
                &self,
                _scope: &Scope,
                _token: Option<&str>,
            ) -> Result<Page<$record>, ApiError> {
                Ok(Page::default())
            }
        };
    }

    impl CloudApi for SlowStorageApi {
        fn storage_buckets(
            &self,
            _scope: &Scope,
            _token: Option<&str>,
        ) -> Result<Page<crate::provider::BucketRecord>, ApiError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Page::default())
        }

        empty_listing!(certificates, crate::provider::CertificateRecord);
        empty_listing!(compute_instances, crate::provider::InstanceRecord);
        empty_listing!(volumes, crate::provider::VolumeRecord);
        empty_listing!(security_groups, crate::provider::SecurityGroupRecord);
        empty_listing!(network_acls, crate::provider::NetworkAclRecord);
        empty_listing!(peering_connections, crate::provider::PeeringRecord);
        empty_listing!(vpn_connections, crate::provider::VpnRecord);
        empty_listing!(customer_gateways, crate::provider::GatewayRecord);
        empty_listing!(db_instances, crate::provider::DbInstanceRecord);
        empty_listing!(kms_keys, crate::provider::KeyRecord);
        empty_listing!(kms_aliases, crate::provider::AliasRecord);
        empty_listing!(iam_users, crate::provider::UserRecord);
        empty_listing!(hosted_zones, crate::provider::ZoneRecord);
        empty_listing!(managed_instances, crate::provider::ManagedInstanceRecord);
        empty_listing!(container_clusters, crate::provider::ClusterRecord);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_deadline_fails_slow_collector_and_keeps_fast_ones() {
        let runner = AuditRunner::new().with_options(
            RunOptions::default()
                .with_deadline(Duration::from_millis(100))
                .with_concurrency(10),
        );
        let results = runner
            .collect_all(
                &["storage".into(), "iam".into(), "dns".into()],
                &Scope::new(),
                Arc::new(SlowStorageApi),
            )
            .await
            .unwrap();

        let storage = results.iter().find(|r| r.service() == "storage").unwrap();
        match storage {
            CollectorResult::Failed { error, .. } => {
                assert!(matches!(error, CollectorError::DeadlineExceeded(_)), "got {error:?}");
            }
            CollectorResult::Collected { .. } => panic!("slow collector should miss the deadline"),
        }
        for service in ["iam", "dns"] {
            let result = results.iter().find(|r| r.service() == service).unwrap();
            assert!(!result.is_failed(), "{service} should complete in time");
        }

        let report = aggregate(&results, runner.rules(), &runner.context());
        assert_eq!(report.collector_errors, 1);
        assert!(report
            .findings
            .iter()
            .any(|f| f.service == "storage" && f.severity == Severity::Error));
    }
}
