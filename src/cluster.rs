//! In-process contracts for the cluster-side collaborators.
//!
//! The pipeline only ever talks to these traits; how an implementation
//! reaches the orchestration platform is its own business. Implementations
//! mark their transient failures with [`crate::retry::transient`] so the
//! poll loops can tell "try again" from "give up".

use anyhow::Result;

/// Queries workload (pod) state.
pub trait WorkloadQuery {
    /// True when every pod matching `selector` in `namespace` is running.
    ///
    /// False means "not yet" and keeps the caller polling; an error marked
    /// transient does the same.
    fn selector_fully_running(&self, namespace: &str, selector: &str) -> Result<bool>;
}

/// Queries a named resource's existence and status fields.
pub trait ResourceQuery {
    /// Whether the named object exists yet.
    fn exists(&self, namespace: &str, name: &str) -> Result<bool>;

    /// A string field out of the object's status by dotted path, e.g.
    /// `status.loadBalancer.ingress.0.ip`.
    ///
    /// An empty string is a legitimate answer meaning "not assigned yet";
    /// it is not an error.
    fn string_field(&self, namespace: &str, name: &str, path: &str) -> Result<String>;

    /// Human-readable status snapshot for failure diagnostics.
    fn describe(&self, namespace: &str, name: &str) -> Result<String>;
}

/// Walks `value` by dotted path, treating numeric segments as array
/// indexes. Returns the string at the leaf, or `None` when the path does
/// not resolve to a string.
///
/// Shared by [`ResourceQuery`] implementations and test fakes so they all
/// agree on one extraction rule.
pub fn json_field<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a str> {
    let mut cur = value;
    for seg in path.split('.') {
        cur = match cur {
            serde_json::Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            serde_json::Value::Object(map) => map.get(seg)?,
            _ => return None,
        };
    }
    cur.as_str()
}
