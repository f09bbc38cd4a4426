use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Path of the chat endpoint relative to the configured base URL.
pub const CHAT_PATH: &str = "/api/chat";

/// A free-text completion capability.
///
/// Implementations receive a fully built instruction and return the model's
/// raw answer; prompt construction and response parsing stay with the caller.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, message: &str, ai_model: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    ai_model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Chat client for the practice backend's `/api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    fn url(&self) -> String {
        format!("{}{CHAT_PATH}", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, message: &str, ai_model: &str) -> Result<String> {
        let url = self.url();
        debug!("POST {url} ({} chars, model {ai_model})", message.len());

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message, ai_model })
            .send()
            .await
            .with_context(|| format!("Failed to connect to chat endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat request failed with status {status}: {body}");
        }

        let data: ChatResponse = response
            .json()
            .await
            .context("Chat endpoint returned an unexpected body")?;

        Ok(data.response)
    }
}
