use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use triage_gateway::bedrock::failure_for_status;
use triage_gateway::context::{ChatMessage, ChatRole};
use triage_gateway::error::GatewayFailure;
use triage_gateway::gateway::{CompletionOptions, TextCompletionGateway};
use triage_gateway::provider::{BoxFuture, CompletionProvider, ProviderReply, ProviderRequest};
use triage_gateway::tokens::TokenCount;

enum Behavior {
    Reply(&'static str),
    Fail(GatewayFailure),
    Hang(Duration),
}

struct ScriptedProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> BoxFuture<'a, Result<ProviderReply, GatewayFailure>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().await = Some(request.clone());
            match &self.behavior {
                Behavior::Reply(text) => Ok(ProviderReply {
                    text: text.to_string(),
                    model_id: "scripted-model".to_string(),
                    usage: Some(TokenCount {
                        input: 120,
                        output: 40,
                    }),
                }),
                Behavior::Fail(failure) => Err(failure.clone()),
                Behavior::Hang(duration) => {
                    tokio::time::sleep(*duration).await;
                    Ok(ProviderReply {
                        text: "late".to_string(),
                        model_id: "scripted-model".to_string(),
                        usage: None,
                    })
                }
            }
        })
    }
}

#[tokio::test]
async fn successful_completion_carries_text_and_usage() {
    let provider = ScriptedProvider::new(Behavior::Reply("{\"severity\":\"Green\"}"));
    let gateway = TextCompletionGateway::new(provider.clone());

    let context = vec![
        ChatMessage::user("Saya demam sejak kemarin."),
        ChatMessage::assistant("Berapa suhu tubuh Anda?"),
    ];
    let options = CompletionOptions::default();
    let completion = gateway
        .complete("38.5 derajat", "Respond in JSON.", &context, &options)
        .await
        .unwrap();

    assert_eq!(completion.text, "{\"severity\":\"Green\"}");
    assert_eq!(completion.model_id, "scripted-model");
    assert_eq!(completion.usage.unwrap().total(), 160);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let request = provider.last_request.lock().await.clone().unwrap();
    assert_eq!(request.system_instruction, "Respond in JSON.");
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.messages[2], ChatMessage::user("38.5 derajat"));
    assert_eq!(request.top_k, options.top_k);
    assert_eq!(request.max_output_tokens, options.max_output_tokens);
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out() {
    let provider = ScriptedProvider::new(Behavior::Hang(Duration::from_secs(120)));
    let gateway = TextCompletionGateway::new(provider.clone());

    let options = CompletionOptions::default();
    assert_eq!(options.request_timeout, Duration::from_secs(60));

    let failure = gateway
        .complete("prompt", "system", &[], &options)
        .await
        .unwrap_err();
    assert_eq!(failure, GatewayFailure::Timeout(Duration::from_secs(60)));
    assert!(failure.is_timeout());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_is_configurable() {
    let provider = ScriptedProvider::new(Behavior::Hang(Duration::from_secs(5)));
    let gateway = TextCompletionGateway::new(provider);

    let short = CompletionOptions {
        request_timeout: Duration::from_secs(2),
        ..CompletionOptions::default()
    };
    assert!(gateway.complete("p", "s", &[], &short).await.unwrap_err().is_timeout());

    let long = CompletionOptions {
        request_timeout: Duration::from_secs(10),
        ..CompletionOptions::default()
    };
    assert_eq!(gateway.complete("p", "s", &[], &long).await.unwrap().text, "late");
}

#[tokio::test]
async fn provider_failure_is_returned_once_without_retry() {
    let provider = ScriptedProvider::new(Behavior::Fail(GatewayFailure::Status {
        status: 503,
        message: "overloaded".to_string(),
    }));
    let gateway = TextCompletionGateway::new(provider.clone());

    let failure = gateway
        .complete("p", "s", &[], &CompletionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(failure, GatewayFailure::Status { status: 503, .. }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_completion_is_a_failure() {
    let provider = ScriptedProvider::new(Behavior::Reply("  \n "));
    let gateway = TextCompletionGateway::new(provider);
    assert_eq!(
        gateway
            .complete("p", "s", &[], &CompletionOptions::default())
            .await
            .unwrap_err(),
        GatewayFailure::EmptyResponse
    );
}

#[test]
fn options_serialize_timeout_in_seconds() {
    let json = serde_json::to_value(CompletionOptions::default()).unwrap();
    assert_eq!(json["request_timeout_secs"], 60);

    let parsed: CompletionOptions = serde_json::from_str(
        r#"{"temperature":0.2,"top_p":0.8,"top_k":20,"max_output_tokens":512,"request_timeout_secs":90}"#,
    )
    .unwrap();
    assert_eq!(parsed.request_timeout, Duration::from_secs(90));
    assert_eq!(parsed.top_k, 20);
    assert_eq!(ChatRole::User, ChatMessage::user("x").role);
}

#[test]
fn bedrock_errors_keep_http_status_when_a_response_arrived() {
    assert_eq!(
        failure_for_status(Some(429), "ThrottlingException: slow down".to_string()),
        GatewayFailure::Status {
            status: 429,
            message: "ThrottlingException: slow down".to_string(),
        }
    );
    assert_eq!(
        failure_for_status(None, "dispatch failure: connection refused".to_string()),
        GatewayFailure::Invocation("dispatch failure: connection refused".to_string())
    );
    assert!(matches!(
        failure_for_status(Some(200), "unparseable body".to_string()),
        GatewayFailure::Invocation(_)
    ));
}
