// src/engine/session.rs

use std::sync::Arc;

use tracing::debug;

use crate::engine::Launcher;
use crate::errors::{LaunchError, Result};
use crate::exec::{ProcessBackend, ProcessHandle, RunObserver};
use crate::request::GenerationRequest;

/// One interactive session: at most one run in flight at a time.
///
/// A new run is refused with `RunInProgress` until the previous one has
/// reached a terminal state.
pub struct LaunchSession<B: ProcessBackend> {
    launcher: Launcher<B>,
    active: Option<Arc<ProcessHandle>>,
}

impl<B: ProcessBackend> LaunchSession<B> {
    pub fn new(launcher: Launcher<B>) -> Self {
        Self { launcher, active: None }
    }

    pub fn launcher(&self) -> &Launcher<B> {
        &self.launcher
    }

    /// Whether the run control should be enabled.
    pub fn can_launch(&self) -> bool {
        self.active.as_ref().is_none_or(|h| !h.is_running())
    }

    pub fn active(&self) -> Option<Arc<ProcessHandle>> {
        self.active.clone()
    }

    pub fn launch(&mut self, request: &GenerationRequest, observer: Box<dyn RunObserver>) -> Result<Arc<ProcessHandle>> {
        self.ensure_idle()?;
        let handle = Arc::new(self.launcher.launch(request, observer)?);
        self.active = Some(Arc::clone(&handle));
        Ok(handle)
    }

    pub fn install_dependencies(&mut self, observer: Box<dyn RunObserver>) -> Result<Arc<ProcessHandle>> {
        self.ensure_idle()?;
        let handle = Arc::new(self.launcher.install_dependencies(observer)?);
        self.active = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Cancel the active run, if any is still running.
    pub fn cancel_active(&self) -> bool {
        self.active.as_ref().is_some_and(|h| h.cancel())
    }

    fn ensure_idle(&mut self) -> Result<()> {
        if !self.can_launch() {
            return Err(LaunchError::RunInProgress);
        }
        if self.active.take().is_some() {
            debug!("discarding handle of finished run");
        }
        Ok(())
    }
}
