// src/enhance/model.rs

//! Language-model backends for the prompt enhancer.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{LaunchError, Result};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A causal text-generation model behind some transport.
pub trait LanguageModel: Send + Sync {
    /// Make sure `model_id` is available; failures become `ModelLoadError`.
    fn load<'a>(&'a self, model_id: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Generate a continuation of `messages`, returning only the new text.
    fn generate<'a>(
        &'a self,
        model_id: &'a str,
        messages: &'a [ChatMessage],
        max_new_tokens: u32,
    ) -> BoxFuture<'a, Result<String>>;
}

/// Client for an OpenAI-compatible inference server (vLLM, TGI, llama.cpp
/// server and similar).
#[derive(Debug, Clone)]
pub struct HttpLanguageModel {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLanguageModel {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.endpoint, path)
    }

    async fn served_models(&self) -> Result<Vec<String>> {
        let body: Value = self
            .client
            .get(self.url("models"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_model_list(&body))
    }
}

impl LanguageModel for HttpLanguageModel {
    fn load<'a>(&'a self, model_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let load_error = |reason: String| LaunchError::ModelLoadError {
                model: model_id.to_string(),
                reason,
            };

            let served = self.served_models().await.map_err(|e| load_error(e.to_string()))?;
            debug!(endpoint = %self.endpoint, ?served, "inference server models");

            if served.iter().any(|m| m == model_id) {
                Ok(())
            } else {
                Err(load_error(format!("model is not served by {}", self.endpoint)))
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
            let request = serde_json::json!({
                "model": model_id,
                "messages": messages,
                "max_tokens": max_new_tokens,
            });

            let body: Value = self
                .client
                .post(self.url("chat/completions"))
                .json(&request)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            parse_chat_completion(&body)
        })
    }
}

/// Model ids from a `/v1/models` response.
pub fn parse_model_list(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|models| {
            models
                .iter()
                .filter_map(|m| m["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Assistant text from a `/v1/chat/completions` response.
pub fn parse_chat_completion(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            LaunchError::Other(anyhow::anyhow!(
                "chat completion response has no choices[0].message.content"
            ))
        })
}
