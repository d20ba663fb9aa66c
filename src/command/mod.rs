// src/command/mod.rs

//! Argument-vector construction.
//!
//! - [`builder`] turns a `GenerationRequest` into the argv of a generation
//!   program.
//! - [`installer`] builds the "install requirements" command.
//!
//! Both are pure: no filesystem access, no validation of values.

pub mod builder;
pub mod installer;

pub use builder::{ProgramTable, build_arguments};
pub use installer::installer_arguments;
