// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the generation programs
//! and the dependency installer, using `tokio::process::Command`, and
//! streaming their output back to a caller-supplied observer.
//!
//! - [`runner`] spawns a process and supervises it until exit.
//! - [`handle`] holds the per-run lifecycle state and cancellation channel.
//! - [`observer`] defines the `RunObserver` callbacks.
//! - [`terminate`] sends the non-forceful stop signal and maps exit codes.
//! - [`backend`] provides the `ProcessBackend` trait and the concrete
//!   `RealProcessBackend` used in production, which tests can replace.

pub mod backend;
pub mod handle;
pub mod observer;
pub mod runner;
pub(crate) mod terminate;

pub use backend::{ProcessBackend, RealProcessBackend};
pub use handle::{HandleLink, ProcessHandle, RunState, handle_pair};
pub use observer::{CallbackObserver, ConsoleObserver, RunObserver, observer_fn};
pub use runner::start;
