// src/enhance/mod.rs

//! Prompt enhancement.
//!
//! - [`template`] holds the fixed caption-expansion instructions.
//! - [`model`] defines the `LanguageModel` seam and an HTTP client for an
//!   OpenAI-compatible inference server.
//! - [`enhancer`] ties them together and applies the soft-fail policy.

pub mod enhancer;
pub mod model;
pub mod template;

pub use enhancer::{PromptEnhancer, truncate_chars};
pub use model::{BoxFuture, ChatMessage, HttpLanguageModel, LanguageModel};
