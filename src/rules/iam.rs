//! Identity rules: MFA coverage and access key age.

use super::{Rule, RuleContext, Violation};
use crate::findings::Severity;
use crate::model::{Resource, ResourceKind};

pub(crate) static RULES: &[Rule] = &[
    Rule {
        id: "iam-no-mfa",
        severity: Severity::Warning,
        kinds: &[ResourceKind::IamUser],
        check: iam_no_mfa,
    },
    Rule {
        id: "iam-stale-access-key",
        severity: Severity::Low,
        kinds: &[ResourceKind::IamUser],
        check: iam_stale_access_key,
    },
];

fn iam_no_mfa(resource: &Resource, _ctx: &RuleContext) -> Vec<Violation> {
    let Resource::IamUser(user) = resource else {
        return Vec::new();
    };
    if !user.mfa_devices.is_empty() {
        return Vec::new();
    }
    vec![Violation::new(&user.name, "User has no MFA device configured.")]
}

/// Flags active keys older than the configured maximum. Inactive keys and
/// keys with no recorded creation date are skipped; a disabled key is not a
/// credential exposure and a missing date is not evidence of one.
fn iam_stale_access_key(resource: &Resource, ctx: &RuleContext) -> Vec<Violation> {
    let Resource::IamUser(user) = resource else {
        return Vec::new();
    };
    user.access_keys
        .iter()
        .filter(|key| key.active)
        .filter_map(|key| {
            let created_at = key.created_at?;
            let age_days = (ctx.now - created_at).num_days();
            if age_days <= ctx.access_key_max_age_days {
                return None;
            }
            Some(
                Violation::new(
                    format!("{}:{}", user.name, key.id),
                    format!(
                        "Access key is {age_days} days old (limit {}).",
                        ctx.access_key_max_age_days
                    ),
                )
                .with_evidence("created_at", created_at.to_rfc3339()),
            )
        })
        .collect()
}
