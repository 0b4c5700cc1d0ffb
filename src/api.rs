//! LLM summarization client.
//!
//! This module provides the interface to the summarization service: an
//! OpenAI-compatible `chat/completions` endpoint asked for a one-sentence
//! summary of a news article.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`ChatSummarizer`]: `reqwest` implementation talking to the chat API
//!
//! Calls are made one at a time by the report pipeline and are never retried;
//! a failed call drops that article from its report.

use crate::utils::{truncate_chars, truncate_for_log};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Instruction sent with every article.
pub const SUMMARY_INSTRUCTION: &str =
    "You are an expert summarizer. Please provide a one-sentence summary of the following news article text.";

/// Longest article text sent to the model, in characters.
pub const MAX_INPUT_CHARS: usize = 12_000;

/// Trait for async LLM interaction.
///
/// Implementors of this trait can send text to an LLM and receive a response.
/// This abstraction lets the pipeline run against the real service or a
/// scripted stand-in.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Summarizer backed by an OpenAI-compatible chat completions API.
pub struct ChatSummarizer {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for ChatSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSummarizer")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl ChatSummarizer {
    /// Create a client for `api_base` (e.g. `https://api.openai.com/v1`).
    pub fn new(
        api_base: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn request<'a>(&'a self, text: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SUMMARY_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: truncate_chars(text, MAX_INPUT_CHARS),
                },
            ],
        }
    }
}

/// Pull the summary text out of a chat completions response body.
///
/// An error object, an empty choice list or blank content are all failures.
pub fn parse_summary(body: &str) -> Result<String, Box<dyn Error>> {
    let response: ChatResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(format!("summarization API error: {}", error.message).into());
    }
    let summary = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    if summary.is_empty() {
        return Err("summarization API returned no text".into());
    }
    Ok(summary)
}

impl AskAsync for ChatSummarizer {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(text))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        // Error bodies still carry the API's own message, so parse before checking status.
        let res = parse_summary(&body);
        match &res {
            Ok(summary) if status.is_success() => {
                debug!(elapsed_ms = dt.as_millis() as u64, summary = %truncate_for_log(summary, 120), "API call succeeded");
            }
            Ok(_) => {
                warn!(%status, elapsed_ms = dt.as_millis() as u64, "API call failed");
                return Err(format!("summarization API returned {status}").into());
            }
            Err(e) => {
                warn!(%status, elapsed_ms = dt.as_millis() as u64, error = %e, body = %truncate_for_log(&body, 300), "API call failed");
            }
        }
        res
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted [`AskAsync`] stand-in.

    use super::AskAsync;
    use std::cell::RefCell;
    use std::error::Error;

    /// Summarizes by echoing a prefix of the text; fails for any text
    /// containing one of the configured markers.
    #[derive(Debug, Default)]
    pub struct ScriptedSummarizer {
        fail_markers: Vec<String>,
        asked: RefCell<Vec<String>>,
    }

    impl ScriptedSummarizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(mut self, marker: &str) -> Self {
            self.fail_markers.push(marker.to_string());
            self
        }

        /// Every text the summarizer was asked about, in call order.
        pub fn asked(&self) -> Vec<String> {
            self.asked.borrow().clone()
        }
    }

    impl AskAsync for ScriptedSummarizer {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
            self.asked.borrow_mut().push(text.to_string());
            if self.fail_markers.iter().any(|m| text.contains(m.as_str())) {
                return Err("scripted failure".into());
            }
            let head: String = text.chars().take(10).collect();
            Ok(format!("요약: {head}"))
        }
    }
}
