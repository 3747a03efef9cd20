/// LLM Client — the single point of entry for all chat-completion calls in PostCraft.
///
/// Generation code talks to the narrow `CompletionProvider` trait only. The concrete
/// `ChatCompletionClient` speaks the OpenAI-compatible chat-completions wire format,
/// which both Groq and OpenAI serve.
///
/// Models are hardcoded per provider — do not make configurable to prevent drift.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Hosted providers that serve the chat-completions API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Groq,
    OpenAi,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            Self::Groq => "mixtral-8x7b-32768",
            Self::OpenAi => "gpt-3.5-turbo",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Sampling knobs for a single prompt submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The completion provider trait. Implement this to swap backends without touching
/// prompt building or the aggregation workflow.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one user-role prompt and returns the completion text.
    /// A response with no choice or no message yields an empty string, not an error.
    async fn submit_prompt(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the message text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat-completions client shared by every generation operation.
/// No retries and no request timeout: a failed call surfaces immediately, a hung one hangs.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    provider: ProviderKind,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(provider: ProviderKind, api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            provider,
            api_key,
        })
    }

    pub fn model(&self) -> &'static str {
        self.provider.model()
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn submit_prompt(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: self.provider.model(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.provider.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response.text().unwrap_or_default().to_string())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// In-memory providers for unit tests. Prompts are routed by the kind of
/// generation they ask for, so a test can script each of the four calls.
#[cfg(test)]
pub mod testing {
    use std::sync::Arc;

    use tokio::sync::Notify;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PromptKind {
        Content,
        Hashtags,
        Times,
        Image,
    }

    pub fn classify(prompt: &str) -> PromptKind {
        if prompt.contains("\"query\"") {
            PromptKind::Image
        } else if prompt.contains("hashtags") {
            PromptKind::Hashtags
        } else if prompt.contains("best times") {
            PromptKind::Times
        } else {
            PromptKind::Content
        }
    }

    type Script = dyn Fn(PromptKind) -> Result<String, LlmError> + Send + Sync;

    /// Answers each prompt from a script. An optional gate holds one kind of call
    /// until the test releases it, and `done` fires once that call has returned.
    pub struct ScriptedProvider {
        script: Box<Script>,
        gate: Option<(PromptKind, Arc<Notify>)>,
        pub done: Arc<Notify>,
    }

    impl ScriptedProvider {
        pub fn new(
            script: impl Fn(PromptKind) -> Result<String, LlmError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                script: Box::new(script),
                gate: None,
                done: Arc::new(Notify::new()),
            }
        }

        pub fn gated(mut self, kind: PromptKind, gate: Arc<Notify>) -> Self {
            self.gate = Some((kind, gate));
            self
        }

        /// A provider that answers every kind with plausible output.
        pub fn happy() -> Self {
            Self::new(|kind| Ok(happy_answer(kind)))
        }
    }

    pub fn happy_answer(kind: PromptKind) -> String {
        match kind {
            PromptKind::Content => "Big news!We are launching today 🚀\n\n\n\n\nStay tuned.".into(),
            PromptKind::Hashtags => "#Launch, #Startup, #Tech".into(),
            PromptKind::Times => "Tuesday 10:00 AM, Thursday 2:00 PM".into(),
            PromptKind::Image => {
                r#"{"query": "Rocket Launch", "description": "A rocket lifting off", "alt": "Rocket"}"#
                    .into()
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn submit_prompt(
            &self,
            prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            let kind = classify(prompt);
            if let Some((gated_kind, gate)) = &self.gate {
                if *gated_kind == kind {
                    gate.notified().await;
                    let answer = (self.script)(kind);
                    self.done.notify_one();
                    return answer;
                }
            }
            (self.script)(kind)
        }
    }
}
