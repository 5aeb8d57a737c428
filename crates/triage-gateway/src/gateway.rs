use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::context::ChatMessage;
use crate::error::GatewayFailure;
use crate::provider::{CompletionProvider, ProviderRequest};
use crate::tokens::TokenCount;

/// Default request timeout. Clinical prompts are long and local inference
/// is slow.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sampling and time budget for one completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    #[serde(rename = "request_timeout_secs", with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 1024,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub request_id: Uuid,
    pub text: String,
    pub model_id: String,
    pub usage: Option<TokenCount>,
    pub latency: Duration,
}

/// Thin contract around a [`CompletionProvider`]: exactly one attempt per
/// call, bounded by the request timeout, with every failure returned as a
/// [`GatewayFailure`].
#[derive(Clone)]
pub struct TextCompletionGateway {
    provider: Arc<dyn CompletionProvider>,
}

impl TextCompletionGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Complete `prompt` after the given conversation context.
    ///
    /// The context is sent as-is; trimming it is the caller's job (see
    /// [`crate::context::trim_context`]). Dropping the future cancels the
    /// in-flight request.
    pub async fn complete(
        &self,
        prompt: &str,
        system_instruction: &str,
        context: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, GatewayFailure> {
        let request_id = Uuid::new_v4();

        let mut messages = Vec::with_capacity(context.len() + 1);
        messages.extend_from_slice(context);
        messages.push(ChatMessage::user(prompt));

        let request = ProviderRequest {
            system_instruction: system_instruction.to_string(),
            messages,
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            max_output_tokens: options.max_output_tokens,
        };

        info!(
            request_id = %request_id,
            provider = self.provider.name(),
            turns = request.messages.len(),
            prompt_chars = prompt.chars().count(),
            timeout_secs = options.request_timeout.as_secs(),
            "starting completion"
        );

        let started = Instant::now();
        let outcome =
            tokio::time::timeout(options.request_timeout, self.provider.complete(&request)).await;
        let latency = started.elapsed();

        let reply = match outcome {
            Ok(Ok(reply)) => reply,
            Ok(Err(failure)) => {
                warn!(request_id = %request_id, error = %failure, "completion failed");
                return Err(failure);
            }
            Err(_) => {
                let failure = GatewayFailure::Timeout(options.request_timeout);
                warn!(request_id = %request_id, error = %failure, "completion timed out");
                return Err(failure);
            }
        };

        if reply.text.trim().is_empty() {
            warn!(request_id = %request_id, "completion was empty");
            return Err(GatewayFailure::EmptyResponse);
        }

        info!(
            request_id = %request_id,
            model = %reply.model_id,
            latency_ms = latency.as_millis() as u64,
            output_chars = reply.text.len(),
            "completion finished"
        );

        Ok(Completion {
            request_id,
            text: reply.text,
            model_id: reply.model_id,
            usage: reply.usage,
            latency,
        })
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
