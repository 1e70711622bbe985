//! Backoff loop: run an operation until success or the policy says stop.

use std::time::Instant;

use super::error::is_transient;
use super::policy::{BackoffPolicy, RetryDecision};

/// Runs `op` until it succeeds, fails terminally, or exhausts the policy's
/// attempt and time budgets.
///
/// Success returns immediately with no further delay. A terminal error
/// (not marked transient) short-circuits unmodified; backoff must never
/// mask one by retrying it. On exhaustion the *last observed* error is
/// returned, so callers keep the root cause instead of a generic timeout.
///
/// Side effects of `op` must be idempotent or safely re-triggerable; this
/// loop does not deduplicate them.
pub fn retry_expo<F>(policy: &BackoffPolicy, mut op: F) -> anyhow::Result<()>
where
    F: FnMut() -> anyhow::Result<()>,
{
    let start = Instant::now();
    let mut attempt = 1u32;
    loop {
        match op() {
            Ok(()) => return Ok(()),
            Err(err) => {
                if !is_transient(&err) {
                    return Err(err);
                }
                match policy.decide(attempt, start.elapsed()) {
                    RetryDecision::Stop => return Err(err),
                    RetryDecision::After(delay) => {
                        tracing::debug!(
                            "attempt {} failed ({}), retrying in {:?}",
                            attempt,
                            err,
                            delay
                        );
                        std::thread::sleep(delay);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
