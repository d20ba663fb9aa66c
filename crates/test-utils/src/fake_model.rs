use std::sync::{Arc, Mutex};

use genlaunch::enhance::{BoxFuture, ChatMessage, LanguageModel};
use genlaunch::errors::{LaunchError, Result};

/// A generate call seen by [`FakeModel`].
#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub model_id: String,
    pub messages: Vec<ChatMessage>,
    pub max_new_tokens: u32,
}

/// In-memory language model with scripted behaviour.
#[derive(Debug)]
pub struct FakeModel {
    /// Models that `load` accepts.
    pub available: Vec<String>,
    /// Reply to every generate call; `Err` text becomes a failure.
    pub reply: std::result::Result<String, String>,
    pub calls: Arc<Mutex<Vec<GenerateCall>>>,
}

impl FakeModel {
    pub fn replying(available: &[&str], reply: &str) -> Self {
        Self {
            available: available.iter().map(|s| s.to_string()).collect(),
            reply: Ok(reply.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing(available: &[&str], error: &str) -> Self {
        Self {
            available: available.iter().map(|s| s.to_string()).collect(),
            reply: Err(error.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl LanguageModel for FakeModel {
    fn load<'a>(&'a self, model_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.available.iter().any(|m| m == model_id) {
                Ok(())
            } else {
                Err(LaunchError::Other(anyhow::anyhow!("weights for {model_id} not found")))
            }
        })
    }

    fn generate<'a>(
        &'a self,
        model_id: &'a str,
        messages: &'a [ChatMessage],
        max_new_tokens: u32,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(GenerateCall {
                model_id: model_id.to_string(),
                messages: messages.to_vec(),
                max_new_tokens,
            });
            self.reply
                .clone()
                .map_err(|e| LaunchError::Other(anyhow::anyhow!(e)))
        })
    }
}
