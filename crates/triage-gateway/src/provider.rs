use std::future::Future;
use std::pin::Pin;

use crate::context::ChatMessage;
use crate::error::GatewayFailure;
use crate::tokens::TokenCount;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a provider is asked to complete.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub system_instruction: String,
    /// Prior turns followed by the prompt as the final user turn.
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Raw provider answer. No schema guarantee on `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub text: String,
    pub model_id: String,
    pub usage: Option<TokenCount>,
}

/// A remote text-generation backend.
///
/// Implementations make one network attempt per call and map every failure
/// into [`GatewayFailure`]. Dropping the returned future must abandon the
/// request. Methods return boxed futures for dyn compatibility.
pub trait CompletionProvider: Send + Sync {
    /// Short identifier used in logs (e.g. "bedrock").
    fn name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> BoxFuture<'a, Result<ProviderReply, GatewayFailure>>;
}
