use std::future::ready;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use shopit_model::{Message, Role, ToolCall, Transcript};
use shopit_test_model::{PresetEvent, PresetResponse, TestChatProvider};

use super::*;
use crate::artifact::extract;
use crate::payload::Recipe;
use crate::tool::{Tool, ToolResult};

static SCHEMA: &Value = &Value::Null;

struct RecipeTool;

impl Tool for RecipeTool {
    type Input = Recipe;

    fn name(&self) -> &str {
        "displayRecipeIngredients"
    }

    fn description(&self) -> &str {
        "Shows a recipe"
    }

    fn parameter_schema(&self) -> &Value {
        SCHEMA
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        ready(serde_json::to_value(input).map_err(|err| {
            crate::tool::Error::execution_error().with_reason(err.to_string())
        }))
    }
}

fn tool_call(id: &str, name: &str, arguments: Value) -> PresetEvent {
    PresetEvent::ToolCall(ToolCall {
        id: id.to_owned(),
        name: name.to_owned(),
        arguments,
    })
}

type Snapshots = Arc<Mutex<Vec<Transcript>>>;

fn snapshots(builder: SessionBuilder) -> (SessionBuilder, Snapshots) {
    let seen = Arc::new(Mutex::new(vec![]));
    let builder = builder.on_update({
        let seen = Arc::clone(&seen);
        move |transcript| seen.lock().unwrap().push(transcript.clone())
    });
    (builder, seen)
}

#[tokio::test]
async fn test_simple_message() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::with_events([
        PresetEvent::TextDelta("Hi, ".to_owned()),
        PresetEvent::TextDelta("what are we cooking?".to_owned()),
    ]));

    let (builder, seen) = snapshots(
        SessionBuilder::with_provider(provider.clone())
            .with_system_prompt("You are a grocery assistant."),
    );
    let mut session = builder.build();
    session.send_message("Hello").await.unwrap();

    let messages = session.transcript().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].content, "Hi, what are we cooking?");
    assert_ne!(messages[0].id, messages[1].id);

    // One update for the new messages and one per text delta.
    assert_eq!(seen.lock().unwrap().len(), 3);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[0].messages[0].role, Role::System);
    assert_eq!(requests[0].messages[1].content, "Hello");
}

#[tokio::test]
async fn test_tool_round_trip() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::with_events([tool_call(
        "call_1",
        "displayRecipeIngredients",
        json!({
            "dish": "Pasta",
            "ingredients": [{ "name": "Spaghetti", "quantity": 200, "unit": "g" }]
        }),
    )]));
    provider.add_response(PresetResponse::text("Enjoy your pasta!"));

    let mut session = SessionBuilder::with_provider(provider.clone())
        .with_tool(RecipeTool)
        .build();
    session.send_message("Pasta for two").await.unwrap();

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    let assistant = &transcript.messages()[1];
    assert_eq!(assistant.content, "Enjoy your pasta!");
    assert!(assistant.tool_invocations[0].is_completed());

    let artifacts = extract(transcript);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].label(), "Recipe: Pasta");

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].tools.len(), 1);
    // The first request doesn't carry the empty assistant message.
    assert_eq!(requests[0].messages.len(), 1);
    let last = requests[1].messages.last().unwrap();
    assert_eq!(
        last.tool_invocations[0].result(),
        assistant.tool_invocations[0].result()
    );
}

#[tokio::test]
async fn test_unknown_tool() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::with_events([tool_call(
        "call_1",
        "teleport",
        json!({}),
    )]));
    provider.add_response(PresetResponse::text("Sorry."));

    let mut session = SessionBuilder::with_provider(provider).build();
    session.send_message("Beam me up").await.unwrap();

    let invocation = session.transcript().invocations().next().unwrap();
    assert_eq!(
        invocation.result(),
        Some(&json!({ "error": "unknown tool: teleport" }))
    );
}

#[tokio::test]
async fn test_invalid_tool_input() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::with_events([tool_call(
        "call_1",
        "displayRecipeIngredients",
        json!({ "ingredients": "lots" }),
    )]));
    provider.add_response(PresetResponse::text("Let me retry."));

    let mut session = SessionBuilder::with_provider(provider)
        .with_tool(RecipeTool)
        .build();
    session.send_message("Cake").await.unwrap();

    let invocation = session.transcript().invocations().next().unwrap();
    let result = invocation.result().unwrap();
    assert!(result["error"].is_string());
}

#[tokio::test]
async fn test_max_steps() {
    let mut provider = TestChatProvider::default();
    for i in 0..3 {
        provider.add_response(PresetResponse::with_events([tool_call(
            &format!("call_{i}"),
            "displayRecipeIngredients",
            json!({ "dish": "Soup" }),
        )]));
    }

    let mut session = SessionBuilder::with_provider(provider.clone())
        .with_tool(RecipeTool)
        .with_max_steps(2)
        .build();
    session.send_message("Soup").await.unwrap();

    assert_eq!(provider.requests().len(), 2);
    assert_eq!(session.transcript().invocations().count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_retry() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::text("Finally.").with_failures(2));

    let mut session = SessionBuilder::with_provider(provider.clone()).build();
    session.send_message("Hello?").await.unwrap();

    assert_eq!(provider.requests().len(), 3);
    assert_eq!(session.transcript().messages()[1].content, "Finally.");
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhausted() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::text("Never.").with_failures(0));

    let mut session = SessionBuilder::with_provider(provider.clone())
        .with_retry_policy(RetryPolicy::default().with_max_retries(1))
        .build();
    let err = session.send_message("Hello?").await.unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(provider.requests().len(), 2);
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn test_other_errors_are_not_retried() {
    let provider = TestChatProvider::default();
    let mut session = SessionBuilder::with_provider(provider.clone()).build();
    let err = session.send_message("Hello?").await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Provider {
            kind: ErrorKind::Other,
            ..
        }
    ));
    assert_eq!(provider.requests().len(), 1);
    assert!(matches!(
        session.send_message("  ").await,
        Err(SessionError::EmptyMessage)
    ));
}

#[tokio::test]
async fn test_resume_transcript() {
    let mut provider = TestChatProvider::default();
    provider.add_response(PresetResponse::text("Welcome back."));

    let saved = Transcript::from(vec![
        Message::system("sys", "Be brief."),
        Message::user("msg:0", "Hi"),
        Message::assistant("msg:1", "Hello"),
    ]);
    let mut session = SessionBuilder::with_provider(provider.clone())
        .with_system_prompt("Ignored when a system message exists.")
        .with_transcript(saved)
        .build();
    session.send_message("Again").await.unwrap();

    let request = &provider.requests()[0];
    let system_count = request
        .messages
        .iter()
        .filter(|msg| msg.role == Role::System)
        .count();
    assert_eq!(system_count, 1);
    assert_eq!(request.messages[0].content, "Be brief.");

    let ids: Vec<_> = session
        .transcript()
        .messages()
        .iter()
        .map(|msg| msg.id.as_str())
        .collect();
    assert_eq!(ids, ["sys", "msg:0", "msg:1", "msg:3", "msg:4"]);
}
