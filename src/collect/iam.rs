//! Identity collector: users, their MFA devices and access keys.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{AccessKey, IamUser, Resource};
use crate::provider::{AccessKeyRecord, CloudApi, UserRecord};
use crate::scope::Scope;

pub struct IamCollector;

impl Collector for IamCollector {
    fn service(&self) -> &'static str {
        "iam"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.iam_users(scope, token))?;
        debug!(users = records.len(), "iam listing complete");
        Ok(records
            .into_iter()
            .map(|record| Resource::IamUser(map_user(record)))
            .collect())
    }
}

fn map_user(record: UserRecord) -> IamUser {
    IamUser {
        name: record.user_name,
        mfa_devices: record.mfa_devices,
        access_keys: record.access_keys.into_iter().map(map_access_key).collect(),
    }
}

fn map_access_key(record: AccessKeyRecord) -> AccessKey {
    AccessKey {
        id: record.access_key_id,
        active: record.status.eq_ignore_ascii_case("active"),
        created_at: record.create_date.as_deref().and_then(parse_timestamp),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SnapshotApi;
    use serde_json::json;

    #[test]
    fn test_collect_normalizes_users() {
        let api = SnapshotApi::from_value(json!({
            "Iam": {"Users": [
                {
                    "UserName": "alice",
                    "MfaDevices": ["arn:mfa/alice"],
                    "AccessKeys": [
                        {"AccessKeyId": "AKIA1", "Status": "Active", "CreateDate": "2026-01-15T00:00:00Z"},
                        {"AccessKeyId": "AKIA2", "Status": "Inactive"}
                    ]
                },
                {"UserName": "bob"}
            ]}
        }))
        .unwrap();

        let resources = IamCollector.collect(&api, &Scope::new()).unwrap();
        assert_eq!(resources.len(), 2);

        let Resource::IamUser(user) = &resources[0] else {
            panic!("expected a user");
        };
        assert_eq!(user.name, "alice");
        assert_eq!(user.mfa_devices.len(), 1);
        assert_eq!(user.access_keys.len(), 2);
        assert!(user.access_keys[0].active);
        assert!(user.access_keys[0].created_at.is_some());
        assert!(!user.access_keys[1].active);
        assert_eq!(user.access_keys[1].created_at, None);

        let Resource::IamUser(user) = &resources[1] else {
            panic!("expected a user");
        };
        assert!(user.mfa_devices.is_empty());
        assert!(user.access_keys.is_empty());
    }
}
