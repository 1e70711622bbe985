//! The concrete readiness pipeline: workload running, service present,
//! address assigned, path reachable, content as expected.

use anyhow::Context;

use crate::cluster::{ResourceQuery, WorkloadQuery};
use crate::fetch::HttpGet;
use crate::pipeline::{run_stages, AssertionFailed, Stage, StageFailure};
use crate::retry::{poll_immediate, retry_expo, BackoffPolicy, PollConfig};

/// What to verify and how patiently.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    /// Namespace holding the workload and service.
    pub namespace: String,
    /// Label selector for the workload pods, e.g. `run=nginx-svc`.
    pub selector: String,
    /// Name of the backing service object.
    pub service: String,
    /// Dotted status path of the externally assigned address.
    pub address_path: String,
    /// Marker string the fetched body must contain.
    pub expected_marker: String,
    /// Cadence and budget for the observation polls.
    pub poll: PollConfig,
    /// Backoff for the HTTP reachability probe.
    pub backoff: BackoffPolicy,
}

impl RouteSpec {
    pub fn new(
        namespace: impl Into<String>,
        selector: impl Into<String>,
        service: impl Into<String>,
        expected_marker: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            selector: selector.into(),
            service: service.into(),
            address_path: "status.loadBalancer.ingress.0.ip".to_string(),
            expected_marker: expected_marker.into(),
            poll: PollConfig::default(),
            backoff: BackoffPolicy::default(),
        }
    }

    /// Builds a spec from the ambient config plus a verification target.
    pub fn from_config(
        cfg: &crate::config::RouteReadyConfig,
        selector: impl Into<String>,
        service: impl Into<String>,
        expected_marker: impl Into<String>,
    ) -> Self {
        let mut spec = Self::new(cfg.namespace.clone(), selector, service, expected_marker);
        spec.poll = cfg.poll_config();
        spec.backoff = cfg.backoff_policy();
        spec
    }
}

/// Successful verification outcome.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Externally assigned address the route converged on.
    pub address: String,
    /// Body fetched from the route.
    pub body: String,
}

#[derive(Default)]
struct RunState {
    address: String,
    body: String,
}

/// Drives the readiness pipeline to completion.
///
/// Synchronous: the call blocks through the stages' internal waits, every
/// one of which is bounded by `spec.poll` or `spec.backoff`, so it returns
/// in bounded time with either a report or a [`StageFailure`] naming the
/// stage that gave out.
pub fn verify_route(
    spec: &RouteSpec,
    workloads: &dyn WorkloadQuery,
    resources: &dyn ResourceQuery,
    http: &dyn HttpGet,
) -> Result<VerifyReport, StageFailure> {
    tracing::info!(
        "verifying route: service {:?} selector {:?} in namespace {:?}",
        spec.service,
        spec.selector,
        spec.namespace
    );

    let poll = spec.poll;
    let mut state = RunState::default();

    let stages = vec![
        Stage::new("workload-running", move |_: &mut RunState| {
            poll_immediate(poll.interval, poll.timeout, || {
                workloads.selector_fully_running(&spec.namespace, &spec.selector)
            })
        }),
        Stage::new("service-exists", move |_: &mut RunState| {
            poll_immediate(poll.interval, poll.timeout, || {
                resources.exists(&spec.namespace, &spec.service)
            })
        }),
        Stage::new("address-assigned", move |st: &mut RunState| {
            poll_immediate(poll.interval, poll.timeout, || {
                let addr =
                    resources.string_field(&spec.namespace, &spec.service, &spec.address_path)?;
                if addr.is_empty() {
                    return Ok(false);
                }
                st.address = addr;
                Ok(true)
            })
        })
        .with_diagnostics(move |_| resources.describe(&spec.namespace, &spec.service).ok()),
        Stage::new("path-reachable", move |st: &mut RunState| {
            let url = url::Url::parse(&format!("http://{}/", st.address))
                .with_context(|| format!("building probe URL from address {:?}", st.address))?;
            retry_expo(&spec.backoff, || {
                st.body = http.get(url.as_str())?;
                Ok(())
            })
        }),
        Stage::new("content-matches", move |st: &mut RunState| {
            if st.body.contains(&spec.expected_marker) {
                Ok(())
            } else {
                Err(anyhow::Error::new(AssertionFailed {
                    expected: spec.expected_marker.clone(),
                    got: preview(&st.body),
                }))
            }
        }),
    ];

    run_stages(&mut state, stages)?;

    tracing::info!("route converged at {}", state.address);
    Ok(VerifyReport {
        address: state.address,
        body: state.body,
    })
}

/// Keeps assertion messages readable when a server returns a large page.
fn preview(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_CHARS).collect();
        format!("{} [truncated, {} bytes total]", head, body.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_defaults_match_the_usual_ingress_path() {
        let spec = RouteSpec::new("default", "run=nginx-svc", "nginx-svc", "Welcome to nginx!");
        assert_eq!(spec.address_path, "status.loadBalancer.ingress.0.ip");
        assert_eq!(spec.poll.interval, std::time::Duration::from_secs(1));
        assert_eq!(spec.backoff.max_attempts, 6);
    }

    #[test]
    fn from_config_carries_namespace_and_budgets() {
        let mut cfg = crate::config::RouteReadyConfig::default();
        cfg.namespace = "tunnel-test".to_string();
        cfg.poll = Some(crate::config::PollSettings {
            interval_secs: 0.25,
            timeout_secs: 30,
        });
        let spec = RouteSpec::from_config(&cfg, "run=nginx-svc", "nginx-svc", "Welcome to nginx!");
        assert_eq!(spec.namespace, "tunnel-test");
        assert_eq!(spec.poll.interval, std::time::Duration::from_millis(250));
        assert_eq!(spec.poll.timeout, std::time::Duration::from_secs(30));
    }

    #[test]
    fn preview_truncates_large_bodies() {
        let short = preview("small body");
        assert_eq!(short, "small body");

        let long = "x".repeat(5000);
        let p = preview(&long);
        assert!(p.len() < 300);
        assert!(p.contains("truncated"));
        assert!(p.contains("5000"));
    }
}
