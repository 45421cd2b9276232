//! Pass-through client for the hosted completion API.
//!
//! The raw user message becomes the entire prompt: a single user-role
//! message, no system prompt, no history, no retries.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

pub const CHAT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

pub struct ChatClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_base: config.openai_api_base.clone(),
            api_key: config.openai_api_key.clone(),
        }
    }

    pub async fn complete(&self, message: &str) -> Result<String, AppError> {
        let request = CompletionRequest {
            model: CHAT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: message,
            }],
        };

        let response: CompletionResponse = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AppError::EmptyCompletion)
    }
}
