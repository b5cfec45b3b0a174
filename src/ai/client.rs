use crate::ai::stream::SseDecoder;
use crate::config::Config;
use crate::error::AiError;
use crate::logger;
use async_trait::async_trait;
use futures::StreamExt;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub const APP_TITLE: &str = "StudyBot";
pub const APP_REFERER: &str = "https://github.com/studybot/studybot";
const COMPLETIONS_PATH: &str = "chat/completions";

/// Text deltas of a streamed completion. An `Err` item ends the stream.
pub type ChunkReceiver = mpsc::Receiver<Result<String, AiError>>;

/// One message of the wire conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Transport seam over the hosted chat completions API, so services can be
/// exercised against a scripted backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Non-streaming completion returning `choices[0].message.content`.
    async fn complete(&self, messages: Vec<ChatTurn>, temperature: f32)
    -> Result<String, AiError>;

    /// Streaming completion yielding incremental content deltas.
    async fn stream(
        &self,
        messages: Vec<ChatTurn>,
        temperature: f32,
    ) -> Result<ChunkReceiver, AiError>;
}

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::MissingCredentials)?;
        let base_url = base_url_for(&config.api_url)?;
        let client = openrouter_api::OpenRouterClient::new()
            .with_base_url(base_url)
            .and_then(|client| {
                client
                    .with_http_referer(APP_REFERER)
                    .with_site_title(APP_TITLE)
                    .with_api_key(api_key.as_str())
            })
            .map_err(|e| AiError::Request(format!("Failed to create OpenRouter client: {}", e)))?;

        Ok(Self {
            client,
            http: reqwest::Client::new(),
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    fn build_request(&self, messages: &[ChatTurn], temperature: f32) -> ChatCompletionRequest {
        let messages = messages
            .iter()
            .map(|turn| Message::text(turn.role.as_str(), turn.content.as_str()))
            .collect();

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: None,
            temperature: Some(temperature),
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenRouterClient {
    async fn complete(
        &self,
        messages: Vec<ChatTurn>,
        temperature: f32,
    ) -> Result<String, AiError> {
        let request = self.build_request(&messages, temperature);

        let response = self
            .client
            .chat()
            .map_err(|e| AiError::Request(e.to_string()))?
            .chat_completion(request)
            .await
            .map_err(|e| AiError::Request(format!("OpenRouter API error: {}", e)))?;

        let choice = response.choices.first().ok_or(AiError::EmptyResponse)?;
        let text = match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => text.clone(),
            openrouter_api::MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| {
                    if let openrouter_api::ContentPart::Text(tc) = p {
                        Some(tc.text.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<String>>()
                .join("\n"),
        };

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }

    async fn stream(
        &self,
        messages: Vec<ChatTurn>,
        temperature: f32,
    ) -> Result<ChunkReceiver, AiError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "stream": true,
        });

        logger::log(&format!("Starting streaming request to {}", self.api_url));

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::HttpStatus {
                status: status.as_u16(),
                message: error_message_from_body(&text)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            });
        }

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => {
                        for delta in decoder.push(&chunk) {
                            if tx.send(Ok(delta)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx
                            .send(Err(AiError::Request(format!("Stream error: {}", e))))
                            .await;
                        return;
                    }
                }
            }

            for delta in decoder.finish() {
                if tx.send(Ok(delta)).await.is_err() {
                    return;
                }
            }
        });

        Ok(rx)
    }
}

/// Base URL for the openrouter_api client, which appends `chat/completions`
/// itself. Both transports then target the configured endpoint.
fn base_url_for(api_url: &str) -> Result<String, AiError> {
    let trimmed = api_url.trim_end_matches('/');
    trimmed
        .strip_suffix(COMPLETIONS_PATH)
        .filter(|base| base.ends_with('/'))
        .map(str::to_string)
        .ok_or_else(|| {
            AiError::Request(format!(
                "API URL must end with /{}: {}",
                COMPLETIONS_PATH, api_url
            ))
        })
}

/// OpenRouter reports failures as `{"error": {"message": "..."}}`.
fn error_message_from_body(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
