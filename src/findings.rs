//! Core finding types shared by every stage of an audit run.
//!
//! A [`Finding`] is one misconfiguration observed on one resource. The
//! aggregator folds findings into a [`Report`], which is the stable output
//! contract of the crate: consumers may rely on its field names and on the
//! ordering of `findings`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered from most to least urgent.
///
/// `Error` is not a misconfiguration severity: it marks findings synthesized
/// from a failed collector, and sorts after everything else so real findings
/// lead the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
    Warning,
    Error,
}

impl Severity {
    /// All severities in report order.
    pub const ALL: [Severity; 5] = [
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Warning,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observation produced by evaluating one rule against one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Service the resource belongs to, e.g. `storage`.
    pub service: String,
    /// Identifier of the offending resource within its service.
    pub resource_id: String,
    /// Stable identifier of the rule that fired, e.g. `bucket-public`.
    pub rule_id: String,
    pub severity: Severity,
    /// Human-readable description of what is wrong.
    pub message: String,
    /// Supporting detail, keyed by attribute name. Kept sorted so serialized
    /// output is byte-stable.
    #[serde(default)]
    pub evidence: BTreeMap<String, String>,
}

impl Finding {
    pub fn new(
        service: impl Into<String>,
        resource_id: impl Into<String>,
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            resource_id: resource_id.into(),
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            evidence: BTreeMap::new(),
        }
    }

    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }

    /// Identity triple used for deduplication.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.service, &self.resource_id, &self.rule_id)
    }
}

/// Count of findings per severity. Every severity is always present in the
/// serialized form, zero or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "HIGH")]
    pub high: usize,
    #[serde(rename = "MEDIUM")]
    pub medium: usize,
    #[serde(rename = "LOW")]
    pub low: usize,
    #[serde(rename = "WARNING")]
    pub warning: usize,
    #[serde(rename = "ERROR")]
    pub error: usize,
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        findings.iter().fold(Self::default(), |mut summary, finding| {
            *summary.slot_mut(finding.severity) += 1;
            summary
        })
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    pub fn total(&self) -> usize {
        Severity::ALL.iter().map(|s| self.count(*s)).sum()
    }

    fn slot_mut(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::Warning => &mut self.warning,
            Severity::Error => &mut self.error,
        }
    }
}

/// Final product of an audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Deduplicated findings, sorted by severity, service, resource and rule.
    pub findings: Vec<Finding>,
    pub summary: Summary,
    /// Number of collectors that failed to produce a complete listing.
    pub collector_errors: usize,
}

impl Report {
    /// Whether the run passes the default exit-code policy: no HIGH findings
    /// and every collector completed.
    pub fn passed(&self) -> bool {
        self.summary.high == 0 && self.collector_errors == 0
    }

    /// Severity of the most urgent finding, if any. Findings are sorted, so
    /// this is the first entry.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.findings.first().map(|f| f.severity)
    }
}
