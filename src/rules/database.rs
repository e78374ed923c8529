//! Managed database rules.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "db-public",
        severity: Severity::High,
        kinds: &[ResourceKind::DbInstance],
        check: db_public,
    },
    Rule {
        id: "db-unencrypted",
        severity: Severity::Medium,
        kinds: &[ResourceKind::DbInstance],
        check: db_unencrypted,
    },
    Rule {
        id: "db-encryption-unknown",
        severity: Severity::Low,
        kinds: &[ResourceKind::DbInstance],
        check: db_encryption_unknown,
    },
];

fn db_public(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::DbInstance(db) = resource else {
        return Vec::new();
    };
    if !db.publicly_accessible {
        return Vec::new();
    }
    vec![
        Violation::new(&db.id, "Database instance is publicly accessible.")
            .with_evidence("engine", &db.engine),
    ]
}

fn db_unencrypted(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::DbInstance(db) = resource else {
        return Vec::new();
    };
    if !db.encryption.is_disabled() {
        return Vec::new();
    }
    vec![
        Violation::new(&db.id, "Database storage is not encrypted.")
            .with_evidence("engine", &db.engine),
    ]
}

fn db_encryption_unknown(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::DbInstance(db) = resource else {
        return Vec::new();
    };
    if !db.encryption.is_unknown() {
        return Vec::new();
    }
    vec![Violation::new(
        &db.id,
        "Database storage encryption status could not be determined.",
    )]
}
