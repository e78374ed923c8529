use crate::findings::{Finding, Report};
use crate::reporter::Reporter;

const HEADER: &str = "service,severity,resource_id,rule_id,message,evidence";

/// Machine-readable findings export for spreadsheets and diffing between runs.
/// Evidence pairs are flattened into a single `key=value; key=value` column.
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_row(&self, finding: &Finding) -> String {
        let evidence = finding
            .evidence
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        [
            escape(&finding.service),
            escape(finding.severity.as_str()),
            escape(&finding.resource_id),
            escape(&finding.rule_id),
            escape(&finding.message),
            escape(&evidence),
        ]
        .join(",")
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for CsvReporter {
    fn report(&self, report: &Report) -> String {
        let mut output = String::from(HEADER);
        output.push('\n');
        for finding in &report.findings {
            output.push_str(&self.format_row(finding));
            output.push('\n');
        }
        output
    }
}

/// Quotes a field when it contains a delimiter, doubling embedded quotes.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
