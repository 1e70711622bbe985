//! Companion-activity signalling.
//!
//! A verification run may share the wall clock with a long-lived companion
//! (e.g. a tunnel/forwarding process) that is started once and left
//! running. The handle here owns the only link back: a single-shot result
//! slot, so a failure is observed instead of silently dropped. There is no
//! shared mutable state between the two activities.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::retry::WaitTimeout;

/// Observes the pass/fail signal of a task started with [`spawn_background`].
pub struct BackgroundHandle {
    name: String,
    rx: mpsc::Receiver<Result<()>>,
    finished: bool,
}

/// Runs `task` on its own named thread and returns a handle to its result.
///
/// The handle does not manage the task's lifecycle beyond having started
/// it; it only observes the one message the task sends when it finishes.
pub fn spawn_background<F>(name: &str, task: F) -> Result<BackgroundHandle>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            // The receiver may be gone if the caller stopped caring; that
            // is not the task's problem.
            let _ = tx.send(task());
        })
        .with_context(|| format!("spawning background task {:?}", name))?;
    Ok(BackgroundHandle {
        name: name.to_string(),
        rx,
        finished: false,
    })
}

impl BackgroundHandle {
    /// Non-blocking look at the task.
    ///
    /// `Ok(true)` means still running, `Ok(false)` finished cleanly, `Err`
    /// carries the task's failure (reported once). A thread that died
    /// without reporting also surfaces as `Err`.
    pub fn check(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        match self.rx.try_recv() {
            Ok(Ok(())) => {
                self.finished = true;
                Ok(false)
            }
            Ok(Err(err)) => Err(err.context(format!("background task {:?} failed", self.name))),
            Err(mpsc::TryRecvError::Empty) => Ok(true),
            Err(mpsc::TryRecvError::Disconnected) => Err(anyhow::anyhow!(
                "background task {:?} exited without reporting",
                self.name
            )),
        }
    }

    /// Waits for the task's signal, bounded by `timeout`.
    pub fn join(self, timeout: Duration) -> Result<()> {
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.context(format!("background task {:?} failed", self.name))),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(anyhow::Error::new(WaitTimeout {
                waited: timeout,
                last: None,
            })
            .context(format!("waiting for background task {:?}", self.name))),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(anyhow::anyhow!(
                "background task {:?} exited without reporting",
                self.name
            )),
        }
    }
}
