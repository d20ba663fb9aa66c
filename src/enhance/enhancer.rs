// src/enhance/enhancer.rs

use std::sync::Arc;

use tracing::{info, warn};

use crate::enhance::model::{ChatMessage, LanguageModel};
use crate::enhance::template::{SYSTEM_MESSAGE, render};
use crate::errors::{LaunchError, Result};
use crate::types::EnhancerModelSize;

/// Rewrites short prompts into detailed video captions.
pub struct PromptEnhancer {
    model: Arc<dyn LanguageModel>,
    model_id: &'static str,
    max_new_tokens: u32,
}

impl std::fmt::Debug for PromptEnhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptEnhancer")
            .field("model_id", &self.model_id)
            .field("max_new_tokens", &self.max_new_tokens)
            .finish_non_exhaustive()
    }
}

impl PromptEnhancer {
    /// Load the model for `size`. Any failure is a `ModelLoadError`.
    pub async fn load(model: Arc<dyn LanguageModel>, size: EnhancerModelSize, max_new_tokens: u32) -> Result<Self> {
        let model_id = size.model_id();
        info!(model = model_id, size = %size, "loading prompt enhancer model");

        model.load(model_id).await.map_err(|e| match e {
            LaunchError::ModelLoadError { .. } => e,
            other => LaunchError::ModelLoadError {
                model: model_id.to_string(),
                reason: other.to_string(),
            },
        })?;

        Ok(Self {
            model,
            model_id,
            max_new_tokens,
        })
    }

    pub fn model_id(&self) -> &str {
        self.model_id
    }

    /// Expand `prompt`. Generation errors are returned as text, not raised.
    pub async fn enhance(&self, prompt: &str) -> String {
        let messages = [ChatMessage::system(SYSTEM_MESSAGE), ChatMessage::user(render(prompt))];

        match self.model.generate(self.model_id, &messages, self.max_new_tokens).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model = self.model_id, error = %e, "prompt enhancement failed");
                format!("Error during prompt enhancement: {e}")
            }
        }
    }
}

/// Cut `text` to at most `max_length` characters.
pub fn truncate_chars(text: &str, max_length: Option<usize>) -> &str {
    match max_length {
        Some(max) => match text.char_indices().nth(max) {
            Some((idx, _)) => &text[..idx],
            None => text,
        },
        None => text,
    }
}
