#[cfg(test)]
pub mod fixtures {
    use crate::findings::{Finding, Report, Severity, Summary};

    pub fn create_finding(
        service: &str,
        resource_id: &str,
        rule_id: &str,
        severity: Severity,
    ) -> Finding {
        Finding::new(service, resource_id, rule_id, severity, "test message")
    }

    pub fn create_report(findings: Vec<Finding>, collector_errors: usize) -> Report {
        let summary = Summary::from_findings(&findings);
        Report {
            findings,
            summary,
            collector_errors,
        }
    }

    pub fn public_bucket_finding() -> Finding {
        Finding::new(
            "storage",
            "logs-bucket",
            "bucket-public",
            Severity::High,
            "Bucket ACL allows access for the internet.",
        )
        .with_evidence("grants", "AllUsers: READ")
    }
}
