//! Failure taxonomy and the structured stage-failure report.

use std::fmt;

use crate::retry::WaitTimeout;

/// Operation succeeded but the observed content was wrong.
#[derive(Debug, thiserror::Error)]
#[error("expected content containing {expected:?}, got: {got:?}")]
pub struct AssertionFailed {
    pub expected: String,
    pub got: String,
}

/// How a stage failed, derived from its error chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A wait budget expired while only transient conditions were observed.
    Timeout,
    /// The operation worked but produced the wrong content.
    Assertion,
    /// Everything else: malformed input, denied permission, programmer error.
    Terminal,
}

impl FailureKind {
    pub fn of(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.downcast_ref::<WaitTimeout>().is_some() {
                return FailureKind::Timeout;
            }
            if cause.downcast_ref::<AssertionFailed>().is_some() {
                return FailureKind::Assertion;
            }
        }
        FailureKind::Terminal
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Assertion => "assertion",
            FailureKind::Terminal => "terminal",
        };
        f.write_str(s)
    }
}

/// The pipeline's one failure report: which stage failed, how, the final
/// underlying error, and any captured diagnostic snapshot.
#[derive(Debug)]
pub struct StageFailure {
    /// Name of the stage that failed.
    pub stage: &'static str,
    /// Taxonomy bucket, for callers that branch on failure class.
    pub kind: FailureKind,
    /// The error the stage returned.
    pub error: anyhow::Error,
    /// Diagnostic text captured at failure time (e.g. a resource's full
    /// status description), if the stage provided a capture callback.
    pub diagnostics: Option<String>,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {:?} failed ({}): {:#}", self.stage, self.kind, self.error)?;
        if let Some(diag) = &self.diagnostics {
            write!(f, "\nstatus snapshot:\n{}", diag)?;
        }
        Ok(())
    }
}

impl std::error::Error for StageFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}
