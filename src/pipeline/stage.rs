//! Stage type and the strict-order sequencer.

use super::report::{FailureKind, StageFailure};

/// One ordered step of a readiness pipeline.
///
/// A stage owns its retry policy: `run` typically wraps a poll or backoff
/// loop internally and returns only once that loop has settled. The
/// optional diagnose callback runs if (and only if) the stage fails, to
/// capture a snapshot for the failure report.
pub struct Stage<'a, C> {
    name: &'static str,
    run: Box<dyn FnMut(&mut C) -> anyhow::Result<()> + 'a>,
    diagnose: Option<Box<dyn FnMut(&mut C) -> Option<String> + 'a>>,
}

impl<'a, C> Stage<'a, C> {
    pub fn new(name: &'static str, run: impl FnMut(&mut C) -> anyhow::Result<()> + 'a) -> Self {
        Self {
            name,
            run: Box::new(run),
            diagnose: None,
        }
    }

    /// Attach a snapshot callback invoked when this stage fails.
    pub fn with_diagnostics(
        mut self,
        f: impl FnMut(&mut C) -> Option<String> + 'a,
    ) -> Self {
        self.diagnose = Some(Box::new(f));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Executes the stages strictly in declared order, each at most once.
///
/// The first error aborts the whole pipeline with a [`StageFailure`]
/// naming the stage, the failure kind, and any captured diagnostics. The
/// sequencer itself never retries.
pub fn run_stages<C>(ctx: &mut C, stages: Vec<Stage<'_, C>>) -> Result<(), StageFailure> {
    for mut stage in stages {
        tracing::info!("stage {}: running", stage.name);
        match (stage.run)(ctx) {
            Ok(()) => tracing::info!("stage {}: done", stage.name),
            Err(error) => {
                let diagnostics = stage.diagnose.as_mut().and_then(|d| d(ctx));
                let kind = FailureKind::of(&error);
                tracing::warn!("stage {}: failed ({}): {:#}", stage.name, kind, error);
                return Err(StageFailure {
                    stage: stage.name,
                    kind,
                    error,
                    diagnostics,
                });
            }
        }
    }
    Ok(())
}
