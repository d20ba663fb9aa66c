// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The launcher talks to a `ProcessBackend` instead of spawning processes
//! directly. Production code uses [`RealProcessBackend`], which hands off to
//! [`runner::start`](super::runner::start); tests provide a backend that
//! records argument vectors and drives a [`ProcessHandle`] through a
//! [`HandleLink`](super::handle::HandleLink) without touching the OS.

use std::path::Path;

use crate::errors::Result;

use super::handle::ProcessHandle;
use super::observer::RunObserver;
use super::runner;

/// Trait abstracting how an argument vector becomes a running process.
pub trait ProcessBackend: Send + Sync {
    /// Start `argv` in `working_dir`, streaming output to `observer`.
    ///
    /// Must return without waiting for the process to finish.
    fn start(
        &self,
        argv: Vec<String>,
        working_dir: &Path,
        observer: Box<dyn RunObserver>,
    ) -> Result<ProcessHandle>;
}

/// Backend that spawns real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessBackend;

impl ProcessBackend for RealProcessBackend {
    fn start(
        &self,
        argv: Vec<String>,
        working_dir: &Path,
        observer: Box<dyn RunObserver>,
    ) -> Result<ProcessHandle> {
        runner::start(&argv, working_dir, observer)
    }
}
