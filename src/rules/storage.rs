//! Object storage rules.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{GrantAudience, Resource, ResourceKind, StorageBucket};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "bucket-public",
        severity: Severity::High,
        kinds: &[ResourceKind::StorageBucket],
        check: bucket_public,
    },
    Rule {
        id: "bucket-authenticated-users",
        severity: Severity::Medium,
        kinds: &[ResourceKind::StorageBucket],
        check: bucket_authenticated_users,
    },
    Rule {
        id: "bucket-no-public-access-block",
        severity: Severity::Low,
        kinds: &[ResourceKind::StorageBucket],
        check: bucket_no_public_access_block,
    },
    Rule {
        id: "bucket-public-access-block-open",
        severity: Severity::Medium,
        kinds: &[ResourceKind::StorageBucket],
        check: bucket_public_access_block_open,
    },
    Rule {
        id: "bucket-unencrypted",
        severity: Severity::Medium,
        kinds: &[ResourceKind::StorageBucket],
        check: bucket_unencrypted,
    },
    Rule {
        id: "bucket-encryption-unknown",
        severity: Severity::Low,
        kinds: &[ResourceKind::StorageBucket],
        check: bucket_encryption_unknown,
    },
];

/// A fully enabled public access block overrides ACL grants, so grants are
/// only reportable when the block is absent or has a gap.
fn acls_effective(bucket: &StorageBucket) -> bool {
    !bucket
        .public_access_block
        .as_ref()
        .is_some_and(|block| block.fully_enabled())
}

fn grant_violation(
    bucket: &StorageBucket,
    audience: GrantAudience,
    message: &str,
) -> Vec<Violation> {
    let permissions: Vec<&str> = bucket
        .public_grants
        .iter()
        .filter(|grant| grant.audience == audience)
        .map(|grant| grant.permission.as_str())
        .collect();
    if permissions.is_empty() || !acls_effective(bucket) {
        return Vec::new();
    }
    vec![Violation::new(&bucket.name, message).with_evidence("permissions", permissions.join(", "))]
}

fn bucket_public(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::StorageBucket(bucket) = resource else {
        return Vec::new();
    };
    grant_violation(
        bucket,
        GrantAudience::AllUsers,
        "Bucket ACL allows access for the internet.",
    )
}

fn bucket_authenticated_users(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::StorageBucket(bucket) = resource else {
        return Vec::new();
    };
    grant_violation(
        bucket,
        GrantAudience::AuthenticatedUsers,
        "Bucket ACL allows access for any authenticated user.",
    )
}

fn bucket_no_public_access_block(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::StorageBucket(bucket) = resource else {
        return Vec::new();
    };
    if bucket.public_access_block.is_some() {
        return Vec::new();
    }
    vec![Violation::new(
        &bucket.name,
        "Bucket has no public access block configuration.",
    )]
}

fn bucket_public_access_block_open(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::StorageBucket(bucket) = resource else {
        return Vec::new();
    };
    let Some(block) = &bucket.public_access_block else {
        return Vec::new();
    };
    if block.fully_enabled() {
        return Vec::new();
    }
    let mut disabled = Vec::new();
    for (enabled, name) in [
        (block.block_public_acls, "block_public_acls"),
        (block.ignore_public_acls, "ignore_public_acls"),
        (block.block_public_policy, "block_public_policy"),
        (block.restrict_public_buckets, "restrict_public_buckets"),
    ] {
        if !enabled {
            disabled.push(name);
        }
    }
    vec![
        Violation::new(&bucket.name, "Public access block is not fully enabled.")
            .with_evidence("disabled", disabled.join(", ")),
    ]
}

fn bucket_unencrypted(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::StorageBucket(bucket) = resource else {
        return Vec::new();
    };
    if !bucket.encryption.is_disabled() {
        return Vec::new();
    }
    vec![Violation::new(
        &bucket.name,
        "Bucket default encryption is disabled.",
    )]
}

fn bucket_encryption_unknown(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::StorageBucket(bucket) = resource else {
        return Vec::new();
    };
    if !bucket.encryption.is_unknown() {
        return Vec::new();
    }
    vec![Violation::new(
        &bucket.name,
        "Bucket encryption status could not be determined.",
    )]
}
