//! Fixed-interval polling with an immediate first attempt.

use std::time::{Duration, Instant};

use super::error::{is_transient, WaitTimeout};

/// Cadence and budget for a poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Sleep between probe attempts. Must be greater than zero.
    pub interval: Duration,
    /// Budget for the whole loop. Zero means an immediate timeout failure.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Repeatedly evaluates `probe` until it reports done, fails terminally,
/// or the budget expires.
///
/// The first attempt happens immediately. `Ok(true)` succeeds regardless
/// of remaining budget and the probe is never called again. A terminal
/// error propagates unchanged. Transient errors and `Ok(false)` keep the
/// loop going; the last transient error rides in the resulting
/// [`WaitTimeout`] for diagnostics.
///
/// One deadline check gates each attempt, and it runs before sleeping:
/// when `elapsed + interval` reaches the budget the loop times out rather
/// than buying one more attempt that would start past the deadline.
pub fn poll_immediate<F>(interval: Duration, timeout: Duration, mut probe: F) -> anyhow::Result<()>
where
    F: FnMut() -> anyhow::Result<bool>,
{
    anyhow::ensure!(!interval.is_zero(), "poll interval must be greater than zero");

    let start = Instant::now();
    let mut last: Option<anyhow::Error> = None;

    if start.elapsed() >= timeout {
        return Err(anyhow::Error::new(WaitTimeout {
            waited: start.elapsed(),
            last,
        }));
    }

    loop {
        match probe() {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) if is_transient(&err) => {
                tracing::debug!("probe failed transiently: {}", err);
                last = Some(err);
            }
            Err(err) => return Err(err),
        }

        let elapsed = start.elapsed();
        if elapsed + interval >= timeout {
            return Err(anyhow::Error::new(WaitTimeout {
                waited: elapsed,
                last,
            }));
        }
        std::thread::sleep(interval);
    }
}
