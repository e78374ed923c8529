use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::collect::CollectorResult;
use crate::findings::Report;

const SERVICE_WIDTH: usize = 12;
const RESOURCE_WIDTH: usize = 30;
const STATUS_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    Compliant,
    NonCompliant,
    Error,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Compliant => "COMPLIANT",
            InventoryStatus::NonCompliant => "NON_COMPLIANT",
            InventoryStatus::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub service: String,
    pub resource_id: String,
    pub status: InventoryStatus,
    pub details: String,
}

/// Per-resource compliance roster built after aggregation. Every collected
/// resource gets a row even when it is clean, and a failed collector gets a
/// single error row so the outage stays visible in exports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn build(results: &[CollectorResult], report: &Report) -> Self {
        let mut items = Vec::new();
        for result in results {
            match result {
                CollectorResult::Collected { service, resources } => {
                    for resource in resources {
                        items.push(resource_item(service, resource.id(), report));
                    }
                }
                CollectorResult::Failed { service, error } => {
                    items.push(InventoryItem {
                        service: (*service).to_string(),
                        resource_id: (*service).to_string(),
                        status: InventoryStatus::Error,
                        details: format!("Audit failed: {error}"),
                    });
                }
            }
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_terminal(&self) -> String {
        let mut output = format!(
            "{} {} {} {}\n",
            format!("{:<SERVICE_WIDTH$}", "SERVICE").bold(),
            format!("{:<RESOURCE_WIDTH$}", "RESOURCE").bold(),
            format!("{:<STATUS_WIDTH$}", "STATUS").bold(),
            "DETAILS".bold()
        );
        for item in &self.items {
            output.push_str(&format!(
                "{:<SERVICE_WIDTH$} {:<RESOURCE_WIDTH$} {} {}\n",
                item.service,
                item.resource_id,
                status_cell(item.status),
                item.details
            ));
        }
        output
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("service,resource_id,status,details\n");
        for item in &self.items {
            output.push_str(&format!(
                "{},{},{},{}\n",
                escape(&item.service),
                escape(&item.resource_id),
                item.status.as_str(),
                escape(&item.details)
            ));
        }
        output
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.items)
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize inventory: {}"}}"#, e))
    }
}

fn resource_item(service: &str, resource_id: &str, report: &Report) -> InventoryItem {
    let prefix = format!("{resource_id}:");
    let messages: Vec<&str> = report
        .findings
        .iter()
        .filter(|finding| {
            finding.service == service
                && (finding.resource_id == resource_id || finding.resource_id.starts_with(&prefix))
        })
        .map(|finding| finding.message.as_str())
        .collect();

    if messages.is_empty() {
        InventoryItem {
            service: service.to_string(),
            resource_id: resource_id.to_string(),
            status: InventoryStatus::Compliant,
            details: "All checks passed.".to_string(),
        }
    } else {
        InventoryItem {
            service: service.to_string(),
            resource_id: resource_id.to_string(),
            status: InventoryStatus::NonCompliant,
            details: messages.join("; "),
        }
    }
}

fn status_cell(status: InventoryStatus) -> ColoredString {
    let label = format!("{:<STATUS_WIDTH$}", status.as_str());
    match status {
        InventoryStatus::Compliant => label.green(),
        InventoryStatus::NonCompliant => label.red().bold(),
        InventoryStatus::Error => label.red(),
    }
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
