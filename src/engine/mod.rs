// src/engine/mod.rs

//! Launch orchestration.
//!
//! - [`launcher`] combines configuration, the command builder and a process
//!   backend.
//! - [`session`] enforces "one run at a time" for interactive front-ends.

pub mod launcher;
pub mod session;

pub use launcher::Launcher;
pub use session::LaunchSession;
