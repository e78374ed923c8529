//! Systems management collector: agent connectivity and patch compliance.

use tracing::debug;

use super::{drain_pages, Collector, CollectorError};
use crate::model::{AgentStatus, ManagedInstance, PatchStatus, Resource};
use crate::provider::{CloudApi, ManagedInstanceRecord};
use crate::scope::Scope;

pub struct AgentsCollector;

impl Collector for AgentsCollector {
    fn service(&self) -> &'static str {
        "agents"
    }

    fn collect(&self, api: &dyn CloudApi, scope: &Scope) -> Result<Vec<Resource>, CollectorError> {
        let records = drain_pages(|token| api.managed_instances(scope, token))?;
        debug!(instances = records.len(), "agents listing complete");
        Ok(records
            .into_iter()
            .map(|record| Resource::ManagedInstance(map_instance(record)))
            .collect())
    }
}

fn map_instance(record: ManagedInstanceRecord) -> ManagedInstance {
    let agent = if record.ping_status.is_empty() {
        AgentStatus::Unknown
    } else if record.ping_status.eq_ignore_ascii_case("online") {
        AgentStatus::Online
    } else {
        // ConnectionLost, Inactive and friends all mean unreachable.
        AgentStatus::Offline
    };
    let patching = match record.patch_state.as_deref() {
        None => PatchStatus::Unknown,
        Some(state)
            if state.eq_ignore_ascii_case("INSTALLED")
                || state.eq_ignore_ascii_case("INSTALLED_OTHER") =>
        {
            PatchStatus::Compliant
        }
        Some(_) => PatchStatus::NonCompliant,
    };
    ManagedInstance {
        id: record.instance_id,
        agent,
        patching,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SnapshotApi;
    use serde_json::json;

    #[test]
    fn test_collect_normalizes_agent_state() {
        let api = SnapshotApi::from_value(json!({
            "Agents": {"ManagedInstances": [
                {"InstanceId": "i-1", "PingStatus": "Online", "PatchState": "INSTALLED"},
                {"InstanceId": "i-2", "PingStatus": "ConnectionLost", "PatchState": "MISSING"},
                {"InstanceId": "i-3"}
            ]}
        }))
        .unwrap();

        let resources = AgentsCollector.collect(&api, &Scope::new()).unwrap();
        assert_eq!(resources.len(), 3);

        let Resource::ManagedInstance(instance) = &resources[0] else {
            panic!("expected a managed instance");
        };
        assert_eq!(instance.agent, AgentStatus::Online);
        assert_eq!(instance.patching, PatchStatus::Compliant);

        let Resource::ManagedInstance(instance) = &resources[1] else {
            panic!("expected a managed instance");
        };
        assert_eq!(instance.agent, AgentStatus::Offline);
        assert_eq!(instance.patching, PatchStatus::NonCompliant);

        let Resource::ManagedInstance(instance) = &resources[2] else {
            panic!("expected a managed instance");
        };
        assert_eq!(instance.agent, AgentStatus::Unknown);
        assert_eq!(instance.patching, PatchStatus::Unknown);
    }

    #[test]
    fn test_installed_other_counts_as_compliant() {
        let instance = map_instance(ManagedInstanceRecord {
            instance_id: "i-9".into(),
            ping_status: "Online".into(),
            patch_state: Some("INSTALLED_OTHER".into()),
        });
        assert_eq!(instance.patching, PatchStatus::Compliant);
    }
}
