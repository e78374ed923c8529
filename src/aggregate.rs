//! Finding aggregation: evaluation, deduplication, ordering, summary.
//!
//! The aggregator is the only place findings are created. For collected
//! services it dispatches every resource to the rules registered for its
//! kind and stamps the rule's identity onto each violation; for failed
//! services it synthesizes exactly one ERROR finding, so a collector outage
//! is always visible in the report itself.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::collect::{CollectorError, CollectorResult};
use crate::findings::{Finding, Report, Severity, Summary};
use crate::rules::{Rule, RuleContext};

/// Rule id carried by findings synthesized from collector failures.
pub const COLLECTOR_ERROR_RULE: &str = "collector-error";

/// Builds the final [`Report`] from collector outcomes.
///
/// Findings are deduplicated on (service, resource, rule) keeping the first
/// one evaluated, then sorted by severity, service, resource and rule. The
/// result depends only on the inputs, so equal runs produce byte-equal
/// reports.
pub fn aggregate(results: &[CollectorResult], rules: &[Rule], ctx: &RuleContext) -> Report {
    let mut findings = Vec::new();

    for result in results {
        match result {
            CollectorResult::Failed { service, error } => {
                findings.push(error_finding(service, error));
            }
            CollectorResult::Collected { service, resources } => {
                for resource in resources {
                    let kind = resource.kind();
                    for rule in rules.iter().filter(|rule| rule.applies_to(kind)) {
                        for violation in (rule.check)(resource, ctx) {
                            findings.push(Finding {
                                service: (*service).to_string(),
                                resource_id: violation.resource_id,
                                rule_id: rule.id.to_string(),
                                severity: rule.severity,
                                message: violation.message,
                                evidence: violation.evidence,
                            });
                        }
                    }
                }
            }
        }
    }

    let mut seen = FxHashSet::default();
    findings.retain(|finding| {
        seen.insert((
            finding.service.clone(),
            finding.resource_id.clone(),
            finding.rule_id.clone(),
        ))
    });

    findings.sort_by(|a, b| {
        (a.severity, &a.service, &a.resource_id, &a.rule_id)
            .cmp(&(b.severity, &b.service, &b.resource_id, &b.rule_id))
    });

    let summary = Summary::from_findings(&findings);
    let collector_errors = results.iter().filter(|result| result.is_failed()).count();
    debug!(
        findings = findings.len(),
        collector_errors, "aggregation complete"
    );

    Report {
        findings,
        summary,
        collector_errors,
    }
}

/// The single finding representing a failed collector. Its resource id is
/// the service name; there is no narrower resource to blame.
fn error_finding(service: &'static str, error: &CollectorError) -> Finding {
    Finding::new(
        service,
        service,
        COLLECTOR_ERROR_RULE,
        Severity::Error,
        format!("Collector failed: {error}"),
    )
    .with_evidence("error", error.to_string())
}
