use colored::{ColoredString, Colorize};

use crate::findings::{Finding, Report, Severity};
use crate::reporter::Reporter;

const SERVICE_WIDTH: usize = 12;
const SEVERITY_WIDTH: usize = 8;
const RESOURCE_WIDTH: usize = 40;
const RULE_WIDTH: usize = 26;

/// Human-readable report for interactive runs. Prints every finding as an
/// aligned table row, then the severity summary and the final verdict.
pub struct TerminalReporter {
    strict: bool,
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(strict: bool, verbose: bool) -> Self {
        Self { strict, verbose }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn severity_cell(&self, severity: Severity) -> ColoredString {
        // Pad before coloring so the escape codes do not break alignment.
        let label = format!("{:<SEVERITY_WIDTH$}", severity.as_str());
        match severity {
            Severity::High => label.red().bold(),
            Severity::Medium => label.yellow().bold(),
            Severity::Low => label.cyan(),
            Severity::Warning => label.white(),
            Severity::Error => label.red(),
        }
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let mut line = format!(
            "{} {} {} {} {}\n",
            clip(&finding.service, SERVICE_WIDTH),
            self.severity_cell(finding.severity),
            clip(&finding.resource_id, RESOURCE_WIDTH),
            clip(&finding.rule_id, RULE_WIDTH),
            finding.message
        );
        if self.verbose {
            for (key, value) in &finding.evidence {
                line.push_str(&format!("    {}\n", format!("{key}: {value}").dimmed()));
            }
        }
        line
    }

    fn summary_line(&self, report: &Report) -> String {
        format!(
            "Summary: {}, {}, {}, {}, {}\n",
            format!("{} HIGH", report.summary.high).red().bold(),
            format!("{} MEDIUM", report.summary.medium).yellow().bold(),
            format!("{} LOW", report.summary.low).cyan(),
            format!("{} WARNING", report.summary.warning),
            format!("{} ERROR", report.summary.error).red()
        )
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &Report) -> String {
        let mut output = String::new();

        if report.findings.is_empty() {
            output.push_str(&format!("{}\n", "No findings.".green()));
        } else {
            output.push_str(&format!(
                "{} {} {} {} {}\n",
                format!("{:<SERVICE_WIDTH$}", "SERVICE").bold(),
                format!("{:<SEVERITY_WIDTH$}", "SEVERITY").bold(),
                format!("{:<RESOURCE_WIDTH$}", "RESOURCE").bold(),
                format!("{:<RULE_WIDTH$}", "RULE").bold(),
                "MESSAGE".bold()
            ));
            for finding in &report.findings {
                output.push_str(&self.format_finding(finding));
            }
        }

        output.push('\n');
        output.push_str(&self.summary_line(report));
        if report.collector_errors > 0 {
            output.push_str(&format!(
                "{}\n",
                format!("Collector errors: {}", report.collector_errors).red()
            ));
        }

        // In strict mode any finding at all is a failure.
        let passed = if self.strict {
            report.findings.is_empty() && report.collector_errors == 0
        } else {
            report.passed()
        };

        let result_text = if passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        output.push_str(&format!(
            "Result: {} (exit code {})\n",
            result_text,
            if passed { 0 } else { 1 }
        ));

        output
    }
}

/// Pads `text` to `width`, truncating with a `...` tail when it does not fit.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return format!("{text:<width$}");
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}
