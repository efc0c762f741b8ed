use crate::domain::cost::model::cost_record::CostRecord;
use crate::domain::cost::model::sharing_policy::{SharingPolicy, KUBE_SYSTEM_NAMESPACE};

/// Whether a record's cost belongs to the shared pool.
///
/// A record is shared when its namespace is `kube-system` or a shared
/// namespace, or when any label selector matches one of its labels exactly.
/// The policy's `enabled` flag is the caller's concern.
pub fn is_shared(policy: &SharingPolicy, record: &CostRecord) -> bool {
    if record.namespace == KUBE_SYSTEM_NAMESPACE
        || policy.shared_namespaces.contains(&record.namespace)
    {
        return true;
    }

    policy
        .label_selectors
        .iter()
        .any(|(name, value)| record.labels.get(name) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(namespace: &str, labels: &[(&str, &str)]) -> CostRecord {
        CostRecord {
            namespace: namespace.into(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            ..Default::default()
        }
    }

    #[test]
    fn kube_system_is_shared_without_configuration() {
        let policy = SharingPolicy::new::<&str>(true, &[], &[], &[]);
        assert!(is_shared(&policy, &record("kube-system", &[])));
        assert!(!is_shared(&policy, &record("default", &[])));
    }

    #[test]
    fn kube_system_is_shared_for_policies_not_built_by_new() {
        let deserialized: SharingPolicy = serde_json::from_value(serde_json::json!({
            "enabled": true,
            "shared_namespaces": [],
            "label_selectors": {}
        }))
        .unwrap();
        assert!(is_shared(&deserialized, &record("kube-system", &[])));
        assert!(!is_shared(&deserialized, &record("default", &[])));

        let literal = SharingPolicy {
            enabled: true,
            shared_namespaces: ["monitoring".to_string()].into(),
            label_selectors: HashMap::new(),
        };
        assert!(is_shared(&literal, &record("kube-system", &[])));
        assert!(is_shared(&literal, &record("monitoring", &[])));
    }

    #[test]
    fn configured_namespaces_are_shared() {
        let policy = SharingPolicy::new(true, &["monitoring"], &[], &[]);
        assert!(is_shared(&policy, &record("monitoring", &[])));
    }

    #[test]
    fn any_matching_selector_qualifies() {
        let policy = SharingPolicy::new(true, &[], &["team", "tier"], &["platform", "infra"]);

        assert!(is_shared(&policy, &record("web", &[("tier", "infra")])));
        assert!(is_shared(&policy, &record("web", &[("team", "platform"), ("tier", "frontend")])));
        assert!(!is_shared(&policy, &record("web", &[("team", "payments")])));
        assert!(!is_shared(&policy, &record("web", &[("owner", "platform")])));
    }
}
