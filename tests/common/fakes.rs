//! Scripted collaborator fakes with call counters.

use std::cell::Cell;

use anyhow::{anyhow, Result};
use serde_json::json;

use routeready::cluster::{json_field, ResourceQuery, WorkloadQuery};
use routeready::fetch::HttpGet;
use routeready::retry::transient;

/// Workload query that reports not-running for the first `not_ready_polls`
/// calls, then running. Set `fail_terminal` to refuse outright instead.
pub struct ScriptedWorkloads {
    pub not_ready_polls: usize,
    pub fail_terminal: Option<&'static str>,
    calls: Cell<usize>,
}

impl ScriptedWorkloads {
    pub fn ready_after(not_ready_polls: usize) -> Self {
        Self {
            not_ready_polls,
            fail_terminal: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            not_ready_polls: 0,
            fail_terminal: Some(message),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl WorkloadQuery for ScriptedWorkloads {
    fn selector_fully_running(&self, _namespace: &str, _selector: &str) -> Result<bool> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if let Some(message) = self.fail_terminal {
            return Err(anyhow!("{}", message));
        }
        Ok(n > self.not_ready_polls)
    }
}

/// Resource query backed by a scripted status document: the address field
/// stays empty for `empty_polls` calls, then carries `address`.
pub struct ScriptedResources {
    pub address: String,
    pub empty_polls: usize,
    pub missing_polls: usize,
    pub describe_text: String,
    exists_calls: Cell<usize>,
    field_calls: Cell<usize>,
}

impl ScriptedResources {
    pub fn assigning(address: &str, empty_polls: usize) -> Self {
        Self {
            address: address.to_string(),
            empty_polls,
            missing_polls: 0,
            describe_text: format!("loadBalancer: ingress ip {}", address),
            exists_calls: Cell::new(0),
            field_calls: Cell::new(0),
        }
    }

    /// A service whose address is never assigned.
    pub fn never_assigned(describe_text: &str) -> Self {
        Self {
            address: String::new(),
            empty_polls: usize::MAX,
            missing_polls: 0,
            describe_text: describe_text.to_string(),
            exists_calls: Cell::new(0),
            field_calls: Cell::new(0),
        }
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.get()
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.get()
    }

    fn status_doc(&self, assigned: bool) -> serde_json::Value {
        if assigned {
            json!({"status": {"loadBalancer": {"ingress": [{"ip": self.address}]}}})
        } else {
            json!({"status": {"loadBalancer": {}}})
        }
    }
}

impl ResourceQuery for ScriptedResources {
    fn exists(&self, _namespace: &str, _name: &str) -> Result<bool> {
        let n = self.exists_calls.get() + 1;
        self.exists_calls.set(n);
        Ok(n > self.missing_polls)
    }

    fn string_field(&self, _namespace: &str, _name: &str, path: &str) -> Result<String> {
        let n = self.field_calls.get() + 1;
        self.field_calls.set(n);
        let assigned = n > self.empty_polls;
        let doc = self.status_doc(assigned);
        Ok(json_field(&doc, path).unwrap_or_default().to_string())
    }

    fn describe(&self, _namespace: &str, _name: &str) -> Result<String> {
        Ok(self.describe_text.clone())
    }
}

/// HTTP client that refuses the first `refuse_first` calls (transient),
/// then serves `body`.
pub struct ScriptedHttp {
    pub body: String,
    pub refuse_first: usize,
    calls: Cell<usize>,
}

impl ScriptedHttp {
    pub fn serving(body: &str, refuse_first: usize) -> Self {
        Self {
            body: body.to_string(),
            refuse_first,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl HttpGet for ScriptedHttp {
    fn get(&self, url: &str) -> Result<String> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n <= self.refuse_first {
            Err(transient(anyhow!("GET {}: connection refused", url)))
        } else {
            Ok(self.body.clone())
        }
    }
}
