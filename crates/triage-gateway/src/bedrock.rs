//! Bedrock Converse API provider.
//!
//! Sampling parameters go through the Converse `inferenceConfig`
//! (temperature, top_p, max_tokens). Converse has no `top_k` field, so it is
//! passed as an additional model request field, which Anthropic models on
//! Bedrock accept.
//!
//! Converse rejects conversations that do not start with a user turn or that
//! repeat a role, so [`converse_turns`] folds the caller's context into a
//! valid alternating sequence before sending.

use std::collections::HashMap;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::{Document, Number};
use tracing::debug;

use crate::context::{ChatMessage, ChatRole};
use crate::error::GatewayFailure;
use crate::provider::{BoxFuture, CompletionProvider, ProviderReply, ProviderRequest};
use crate::tokens;

pub struct BedrockProvider {
    client: Client,
    model_id: String,
}

impl BedrockProvider {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn from_config(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self::new(Client::new(config), model_id)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn converse(&self, request: &ProviderRequest) -> Result<ProviderReply, GatewayFailure> {
        let mut converse_messages: Vec<Message> = Vec::new();
        for msg in converse_turns(&request.messages) {
            let role = match msg.role {
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            let message = Message::builder()
                .role(role)
                .content(ContentBlock::Text(msg.content))
                .build()
                .map_err(|e| GatewayFailure::Invocation(e.to_string()))?;
            converse_messages.push(message);
        }

        let inference = InferenceConfiguration::builder()
            .temperature(request.temperature)
            .top_p(request.top_p)
            .max_tokens(i32::try_from(request.max_output_tokens).unwrap_or(i32::MAX))
            .build();

        let additional = Document::Object(HashMap::from([(
            "top_k".to_string(),
            Document::Number(Number::PosInt(u64::from(request.top_k))),
        )]));

        debug!(model = %self.model_id, turns = converse_messages.len(), "bedrock converse");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(request.system_instruction.clone()))
            .set_messages(Some(converse_messages))
            .inference_config(inference)
            .additional_model_request_fields(additional)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                let message = match e.as_service_error() {
                    Some(service) => service.to_string(),
                    None => DisplayErrorContext(&e).to_string(),
                };
                failure_for_status(status, message)
            })?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| GatewayFailure::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(ProviderReply {
            text,
            model_id: self.model_id.clone(),
            usage: response.usage().map(tokens::extract_token_usage),
        })
    }
}

/// Classify a failed call. A non-success HTTP status becomes
/// [`GatewayFailure::Status`]; anything that never got a response
/// (dispatch, connect, timeout) stays an invocation failure.
pub fn failure_for_status(status: Option<u16>, message: String) -> GatewayFailure {
    match status {
        Some(status) if !(200..300).contains(&status) => GatewayFailure::Status { status, message },
        _ => GatewayFailure::Invocation(message),
    }
}

impl CompletionProvider for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn complete<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> BoxFuture<'a, Result<ProviderReply, GatewayFailure>> {
        Box::pin(self.converse(request))
    }
}

/// Fold turns into the shape Converse accepts: leading assistant turns are
/// dropped and consecutive turns of the same role are joined.
pub fn converse_turns(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut turns: Vec<ChatMessage> = Vec::with_capacity(messages.len());
    for msg in messages {
        if turns.is_empty() && msg.role == ChatRole::Assistant {
            continue;
        }
        match turns.last_mut() {
            Some(last) if last.role == msg.role => {
                last.content.push_str("\n\n");
                last.content.push_str(&msg.content);
            }
            _ => turns.push(msg.clone()),
        }
    }
    turns
}
