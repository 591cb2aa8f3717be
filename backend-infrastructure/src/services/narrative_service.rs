use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use backend_domain::ports::NarrativeService;
use backend_domain::NarrativeConfig;

const SYSTEM_PROMPT: &str =
    "You are a League of Legends performance coach. Reply with a single JSON object and nothing else.";

pub struct HttpNarrativeService {
    client: Client,
    config: NarrativeConfig,
}

impl HttpNarrativeService {
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()
            .context("failed to build narrative http client")?;
        Ok(Self { client, config })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl NarrativeService for HttpNarrativeService {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("narrative endpoint not configured (set REWIND_NARRATIVE_URL)"))?;
        let mut request = self.client.post(url).json(&self.request_body(prompt));
        if let Some(key) = &self.config.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }
        debug!(model = %self.config.model, prompt_len = prompt.len(), "narrative request");
        let response = request.send().await.context("narrative request failed")?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "narrative endpoint rejected request");
            anyhow::bail!("narrative endpoint responded {}", status);
        }
        let body: CompletionResponse = response
            .json()
            .await
            .context("narrative response is not a completion payload")?;
        extract_content(body)
    }
}

fn extract_content(body: CompletionResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("narrative response carried no content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>) -> NarrativeConfig {
        NarrativeConfig {
            url: url.map(ToString::to_string),
            api_key: None,
            model: "test-model".to_string(),
            request_timeout_seconds: 5,
        }
    }

    #[test]
    fn request_body_carries_model_and_prompt() {
        let service = HttpNarrativeService::new(config(None)).expect("client");
        let body = service.request_body("hello");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn content_comes_from_first_choice() {
        let body: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"summary\":\"ok\"}"}}]}"#,
        )
        .expect("decode");
        assert_eq!(extract_content(body).expect("content"), r#"{"summary":"ok"}"#);

        let empty: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("decode");
        assert!(extract_content(empty).is_err());
    }

    #[tokio::test]
    async fn unconfigured_endpoint_fails_fast() {
        let service = HttpNarrativeService::new(config(None)).expect("client");
        let err = service.complete("prompt").await.expect_err("no endpoint");
        assert!(err.to_string().contains("not configured"));
    }
}
