//! Compliance framework presets.
//!
//! A preset is a fixed set of services whose checks back a framework's
//! technical safeguards. Selecting a framework audits exactly that set;
//! combining it with an explicit service list audits the intersection.

use crate::error::{AuditError, Result};

/// Services backing the HIPAA technical safeguard checks. DNS is not part
/// of the safeguard mapping and stays out of the preset.
const HIPAA_SERVICES: &[&str] = &[
    "agents",
    "certificates",
    "compute",
    "containers",
    "database",
    "iam",
    "kms",
    "network",
    "storage",
];

pub fn frameworks() -> &'static [&'static str] {
    &["hipaa"]
}

/// Resolves a framework name to its service preset. Matching is
/// case-insensitive and ignores surrounding whitespace.
pub fn framework_services(name: &str) -> Result<&'static [&'static str]> {
    match name.trim().to_ascii_lowercase().as_str() {
        "hipaa" => Ok(HIPAA_SERVICES),
        _ => Err(AuditError::UnknownFramework {
            name: name.trim().to_string(),
            valid: frameworks().join(", "),
        }),
    }
}

/// Splits an explicit service selection against a framework preset into the
/// services to audit and the ones the framework does not cover.
pub fn intersect(preset: &[&str], requested: &[String]) -> (Vec<String>, Vec<String>) {
    let mut kept = Vec::new();
    let mut excluded = Vec::new();
    for service in requested {
        let normalized = service.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if preset.contains(&normalized.as_str()) {
            if !kept.contains(&normalized) {
                kept.push(normalized);
            }
        } else if !excluded.contains(&normalized) {
            excluded.push(normalized);
        }
    }
    (kept, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hipaa_preset_is_sorted_and_excludes_dns() {
        let services = framework_services("hipaa").unwrap();

        let mut sorted = services.to_vec();
        sorted.sort_unstable();
        assert_eq!(services, sorted.as_slice());
        assert!(!services.contains(&"dns"));
        assert_eq!(services.len(), 9);
    }

    #[test]
    fn test_framework_name_is_normalized() {
        assert!(framework_services("HIPAA").is_ok());
        assert!(framework_services("  hipaa  ").is_ok());
    }

    #[test]
    fn test_unknown_framework_lists_valid_names() {
        let err = framework_services("soc2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown compliance framework 'soc2'. Valid frameworks: hipaa"
        );
    }

    #[test]
    fn test_intersect_splits_covered_and_uncovered() {
        let preset = framework_services("hipaa").unwrap();
        let requested = vec!["storage".to_string(), "dns".to_string(), "iam".to_string()];
        let (kept, excluded) = intersect(preset, &requested);

        assert_eq!(kept, vec!["storage", "iam"]);
        assert_eq!(excluded, vec!["dns"]);
    }

    #[test]
    fn test_intersect_normalizes_and_dedupes() {
        let preset = framework_services("hipaa").unwrap();
        let requested = vec![
            " Storage ".to_string(),
            "storage".to_string(),
            String::new(),
        ];
        let (kept, excluded) = intersect(preset, &requested);

        assert_eq!(kept, vec!["storage"]);
        assert!(excluded.is_empty());
    }
}
