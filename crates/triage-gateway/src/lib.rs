//! triage-gateway
//!
//! Text completion gateway: one bounded, typed attempt against a generative
//! text provider. Providers plug in through [`provider::CompletionProvider`];
//! [`bedrock::BedrockProvider`] is the production implementation.

pub mod bedrock;
pub mod context;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod tokens;
