use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Namespace that is always treated as shared.
pub const KUBE_SYSTEM_NAMESPACE: &str = "kube-system";

/// Decides which workloads have their cost pooled and split across every
/// group instead of being reported under their own group key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharingPolicy {
    pub enabled: bool,
    pub shared_namespaces: HashSet<String>,
    /// label key -> required value
    pub label_selectors: HashMap<String, String>,
}

impl Default for SharingPolicy {
    fn default() -> Self {
        Self::new::<&str>(false, &[], &[], &[])
    }
}

impl SharingPolicy {
    /// Builds a policy from parallel lists of label names and values.
    ///
    /// `kube-system` is always added to the shared namespaces. Names and
    /// values are paired by position; anything without a partner is dropped.
    pub fn new<S: AsRef<str>>(
        enabled: bool,
        shared_namespaces: &[S],
        label_names: &[S],
        label_values: &[S],
    ) -> Self {
        let mut namespaces: HashSet<String> = shared_namespaces
            .iter()
            .map(|ns| ns.as_ref().trim().to_string())
            .filter(|ns| !ns.is_empty())
            .collect();
        namespaces.insert(KUBE_SYSTEM_NAMESPACE.to_string());

        if label_names.len() != label_values.len() {
            warn!(
                "Shared label names ({}) and values ({}) differ in length; ignoring unpaired entries",
                label_names.len(),
                label_values.len()
            );
        }

        let label_selectors = label_names
            .iter()
            .zip(label_values.iter())
            .map(|(k, v)| (k.as_ref().trim().to_string(), v.as_ref().trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        Self {
            enabled,
            shared_namespaces: namespaces,
            label_selectors,
        }
    }
}
