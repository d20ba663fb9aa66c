// src/exec/handle.rs

//! Lifecycle handle for one launched process.
//!
//! A [`ProcessHandle`] is the caller's side; the matching [`HandleLink`] is
//! held by whoever drives the process (the real supervisor task, or a fake
//! backend in tests). The link publishes the terminal state and receives
//! cancellation requests.

use std::sync::Mutex;

use tokio::sync::{oneshot, watch};
use tracing::debug;

/// Observable state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Exited on its own.
    Completed(i32),
    /// Exited after a cancellation request.
    Cancelled(i32),
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunState::Running)
    }

    pub fn exit_code(self) -> Option<i32> {
        match self {
            RunState::Running => None,
            RunState::Completed(code) | RunState::Cancelled(code) => Some(code),
        }
    }
}

#[derive(Debug)]
pub struct ProcessHandle {
    pid: Option<u32>,
    state_rx: watch::Receiver<RunState>,
    cancel_tx: Mutex<Option<oneshot::Sender<()>>>,
}

/// Driver side of a [`ProcessHandle`].
#[derive(Debug)]
pub struct HandleLink {
    state_tx: watch::Sender<RunState>,
    cancel_rx: Option<oneshot::Receiver<()>>,
}

/// Create a connected handle/link pair in the `Running` state.
pub fn handle_pair(pid: Option<u32>) -> (ProcessHandle, HandleLink) {
    let (state_tx, state_rx) = watch::channel(RunState::Running);
    let (cancel_tx, cancel_rx) = oneshot::channel();

    let handle = ProcessHandle {
        pid,
        state_rx,
        cancel_tx: Mutex::new(Some(cancel_tx)),
    };
    let link = HandleLink {
        state_tx,
        cancel_rx: Some(cancel_rx),
    };
    (handle, link)
}

impl ProcessHandle {
    /// OS process id, if the backend runs a real process.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn state(&self) -> RunState {
        *self.state_rx.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.state().is_terminal()
    }

    /// Request termination of the process.
    ///
    /// Returns `true` if the request was queued while the driver was still
    /// listening. A process that exits at the same moment may still finish
    /// as `Completed`. Cancelling a handle that already terminated, one whose
    /// process has been reaped, or cancelling twice, does nothing. The
    /// observer's `on_exit` still fires once the process is gone.
    pub fn cancel(&self) -> bool {
        if self.state().is_terminal() {
            debug!(pid = ?self.pid, "cancel on terminated handle ignored");
            return false;
        }

        let sender = match self.cancel_tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Wait until the run reaches a terminal state.
    ///
    /// If the driver disappears without publishing one, the last observed
    /// state is returned.
    pub async fn wait(&self) -> RunState {
        let mut rx = self.state_rx.clone();
        let terminal = rx.wait_for(|s| s.is_terminal()).await.map(|state| *state);
        terminal.unwrap_or_else(|_| self.state())
    }
}

impl HandleLink {
    /// Resolves to `true` when the caller asks for cancellation.
    ///
    /// Resolves to `false` once if the handle was dropped, then never again.
    /// Safe to use as a `tokio::select!` branch.
    pub async fn cancel_requested(&mut self) -> bool {
        match self.cancel_rx.as_mut() {
            Some(rx) => {
                let requested = rx.await.is_ok();
                self.cancel_rx = None;
                requested
            }
            None => std::future::pending().await,
        }
    }

    /// Stop accepting cancellation; later `cancel` calls return `false`.
    pub fn stop_listening(&mut self) {
        self.cancel_rx = None;
    }

    /// Publish the terminal state; consumes the link.
    pub fn finish(self, state: RunState) {
        debug_assert!(state.is_terminal());
        self.state_tx.send_replace(state);
    }
}
