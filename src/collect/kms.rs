//! Key management collector.
//!
//! Joins the alias listing into the key listing so findings can name keys by
//! their human-readable alias.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{FeatureState, KmsKey, Resource};
use crate::provider::{CloudApi, KeyRecord};
use crate::scope::Scope;

pub struct KmsCollector;

impl Collector for KmsCollector {
    fn service(&self) -> &'static str {
        "kms"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let keys = drain_pages(|token| api.kms_keys(scope, token))?;
        let aliases = drain_pages(|token| api.kms_aliases(scope, token))?;
        debug!(keys = keys.len(), aliases = aliases.len(), "kms listing complete");

        // First alias per key wins; listings are ordered, so this is stable.
        let mut alias_by_key: FxHashMap<&str, &str> = FxHashMap::default();
        for alias in &aliases {
            if let Some(target) = alias.target_key_id.as_deref() {
                alias_by_key.entry(target).or_insert(alias.alias_name.as_str());
            }
        }

        Ok(keys
            .into_iter()
            .map(|record| {
                let alias = alias_by_key.get(record.key_id.as_str()).map(|a| a.to_string());
                Resource::KmsKey(map_key(record, alias))
            })
            .collect())
    }
}

fn map_key(record: KeyRecord, alias: Option<String>) -> KmsKey {
    KmsKey {
        alias,
        state: record.key_state,
        customer_managed: record.key_manager.eq_ignore_ascii_case("customer"),
        symmetric: record.key_spec.to_ascii_uppercase().starts_with("SYMMETRIC"),
        rotation: FeatureState::from_flag(record.rotation_enabled),
        id: record.key_id,
    }
}
