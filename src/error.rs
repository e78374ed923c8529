//! Crate-level error type.
//!
//! Only errors that abort a run before any collector starts live here:
//! invalid selections, bad configuration, an unreadable snapshot. Failures
//! inside a collector are not errors in this sense; they surface as ERROR
//! findings in the report instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::provider::SnapshotError;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Unknown service '{name}'. Valid services: {valid}")]
    UnknownService { name: String, valid: String },

    #[error("Unknown compliance framework '{name}'. Valid frameworks: {valid}")]
    UnknownFramework { name: String, valid: String },

    #[error("None of the requested services are covered by framework '{framework}'")]
    EmptySelection { framework: String },

    #[error("Collector '{name}' is already registered")]
    DuplicateCollector { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load snapshot: {path}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_service() {
        let err = AuditError::UnknownService {
            name: "s3".to_string(),
            valid: "iam, storage".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown service 's3'. Valid services: iam, storage"
        );
    }

    #[test]
    fn test_error_display_unknown_framework() {
        let err = AuditError::UnknownFramework {
            name: "soc1".to_string(),
            valid: "hipaa".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown compliance framework 'soc1'. Valid frameworks: hipaa"
        );
    }

    #[test]
    fn test_error_display_duplicate_collector() {
        let err = AuditError::DuplicateCollector {
            name: "storage".to_string(),
        };
        assert_eq!(err.to_string(), "Collector 'storage' is already registered");
    }
}
