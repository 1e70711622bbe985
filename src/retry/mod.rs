//! Convergence-waiting primitives: transient-error marking, fixed-interval
//! polling, and exponential backoff.
//!
//! This module encapsulates the transient/terminal classification and the
//! two bounded wait loops so that higher layers (the readiness pipeline)
//! share a consistent policy. Every wait here is finite; budget exhaustion
//! always produces an error, never a hang.

mod classify;
mod error;
mod policy;
mod poll;
mod run;

pub use classify::{classify_curl_error, classify_http_status, ErrorKind};
pub use error::{is_transient, transient, Transient, WaitTimeout};
pub use policy::{BackoffPolicy, RetryDecision};
pub use poll::{poll_immediate, PollConfig};
pub use run::retry_expo;
