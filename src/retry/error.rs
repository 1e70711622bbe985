//! Transient-error marking and the budget-exhaustion error.

use std::fmt;
use std::time::Duration;

/// Wrapper that marks an error as transient (safe to retry).
///
/// Display forwards to the cause so logs keep the original message; the
/// cause stays reachable through `source()` for chain formatting.
#[derive(Debug)]
pub struct Transient {
    cause: anyhow::Error,
}

impl fmt::Display for Transient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl std::error::Error for Transient {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Marks `err` so that [`is_transient`] reports it as retryable.
pub fn transient(err: anyhow::Error) -> anyhow::Error {
    anyhow::Error::new(Transient { cause: err })
}

/// True iff `err` (or something it wraps) carries the transient mark.
///
/// A [`WaitTimeout`] in the chain ends the search: an exhausted budget is
/// final even when the last failure it carries was itself transient.
pub fn is_transient(err: &anyhow::Error) -> bool {
    for cause in err.chain() {
        if cause.downcast_ref::<WaitTimeout>().is_some() {
            return false;
        }
        if cause.downcast_ref::<Transient>().is_some() {
            return true;
        }
    }
    false
}

/// Returned when a poll or retry budget expires while only transient
/// failures (or not-yet-ready probes) were observed.
///
/// Carries the last observed non-terminal error so callers can tell
/// "timed out while healthy-looking" from "timed out with a known root
/// cause".
#[derive(Debug)]
pub struct WaitTimeout {
    /// Total time spent before giving up.
    pub waited: Duration,
    /// Last transient failure seen, if any.
    pub last: Option<anyhow::Error>,
}

impl fmt::Display for WaitTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last {
            Some(last) => write!(
                f,
                "timed out after {:?}; last failure: {}",
                self.waited, last
            ),
            None => write!(
                f,
                "timed out after {:?}; condition did not become true",
                self.waited
            ),
        }
    }
}

impl std::error::Error for WaitTimeout {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.last {
            Some(last) => Some(last.as_ref()),
            None => None,
        }
    }
}
