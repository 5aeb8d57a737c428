//! Live Bedrock round trip.
//!
//! Calls the real Converse API and needs valid credentials in the
//! environment (e.g. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`) plus
//! model access for `MODEL_ID` in us-east-1.
//!
//! Run with: `cargo test -p triage-gateway --test bedrock_live -- --ignored`

use std::sync::Arc;

use triage_gateway::bedrock::BedrockProvider;
use triage_gateway::context::ChatMessage;
use triage_gateway::gateway::{CompletionOptions, TextCompletionGateway};

const MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

async fn build_config() -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("us-east-1"))
        .load()
        .await
}

#[tokio::test]
#[ignore]
async fn converse_returns_text_and_usage() {
    let config = build_config().await;
    let gateway = TextCompletionGateway::new(Arc::new(BedrockProvider::from_config(
        &config, MODEL_ID,
    )));
    assert_eq!(gateway.provider_name(), "bedrock");

    // Starts with an assistant turn so converse_turns has to fold it.
    let context = vec![
        ChatMessage::assistant("Hello, how can I help?"),
        ChatMessage::user("I have a mild headache."),
    ];
    let options = CompletionOptions {
        max_output_tokens: 64,
        ..CompletionOptions::default()
    };

    let completion = gateway
        .complete(
            "Reply with the single word OK.",
            "You are a terse assistant.",
            &context,
            &options,
        )
        .await
        .expect("live completion should succeed");

    println!("{} in {:?}: {}", completion.model_id, completion.latency, completion.text);
    assert!(!completion.text.trim().is_empty());
    assert_eq!(completion.model_id, MODEL_ID);
    assert!(completion.usage.is_some(), "bedrock reports token usage");
}
