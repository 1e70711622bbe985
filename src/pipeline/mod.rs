//! Readiness pipeline: ordered stages with structured failure reporting.
//!
//! Stages run strictly in declared order, each at most once. The sequencer
//! never retries a failed stage; retry policy lives entirely inside a
//! stage's own body, which keeps the composition simple and prevents
//! retries compounding across levels.

mod report;
mod stage;

pub use report::{AssertionFailed, FailureKind, StageFailure};
pub use stage::{run_stages, Stage};
