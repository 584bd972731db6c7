//! ReAct agent tests

use futures::StreamExt;
use primer_agents::react::{DEFAULT_QUERY, ReactAgent, SYSTEM_PROMPT, math_tools, should_continue};
use primer_core::{CallContext, Message, PrimerError, ToolCall, ToolContext};
use primer_graph::messages_input;
use primer_model::MockLlm;
use serde_json::json;
use std::sync::Arc;

fn call(id: &str, name: &str, a: f64, b: f64) -> Message {
    Message::ai_with_tool_calls("", vec![ToolCall::new(id, name, json!({"a": a, "b": b}))])
}

#[tokio::test]
async fn test_stream_walks_the_tool_loop() {
    let llm = Arc::new(
        MockLlm::new("mock")
            .with_message(call("c1", "add", 234.0, 5678.0))
            .with_message(call("c2", "multiply", 5912.0, 3.0))
            .with_message(call("c3", "subtract", 17736.0, 1000.0))
            .with_message(Message::ai("The final result is 16736.")),
    );
    let agent = ReactAgent::new(llm.clone()).unwrap();

    let messages: Vec<Message> =
        agent.run_stream(DEFAULT_QUERY).map(|m| m.unwrap()).collect().await;

    assert_eq!(messages.len(), 8);
    assert_eq!(messages[0], Message::human(DEFAULT_QUERY));
    assert_eq!(messages[2], Message::tool("c1", "add", "5912"));
    assert_eq!(messages[4], Message::tool("c2", "multiply", "17736"));
    assert_eq!(messages[6], Message::tool("c3", "subtract", "16736"));
    assert_eq!(messages[7], Message::ai("The final result is 16736."));

    let requests = llm.requests();
    assert_eq!(requests.len(), 4);
    for req in &requests {
        assert_eq!(req.messages[0], Message::system(SYSTEM_PROMPT));
        assert_eq!(req.tools.len(), 3);
    }
    assert_eq!(requests[3].messages.len(), 8);
}

#[tokio::test]
async fn test_plain_answer_ends_immediately() {
    let llm = Arc::new(MockLlm::new("mock").with_message(Message::ai("Hello!")));
    let agent = ReactAgent::new(llm).unwrap();
    let messages: Vec<_> = agent.run_stream("hi").collect().await;
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn test_arithmetic_tools() {
    let tools = math_tools();
    let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["add", "subtract", "multiply"]);

    let ctx = Arc::new(CallContext::new("c1", "subtract")) as Arc<dyn ToolContext>;
    assert_eq!(tools[1].execute(ctx.clone(), json!({"a": 3, "b": 10})).await.unwrap(), json!(-7));

    let err = tools[2].execute(ctx.clone(), json!({"a": i64::MAX, "b": 2})).await.unwrap_err();
    assert!(matches!(err, PrimerError::Tool(ref m) if m.contains("overflows")));

    let err = tools[0].execute(ctx, json!({"a": 1.5, "b": 2})).await.unwrap_err();
    assert!(matches!(err, PrimerError::Tool(_)));
}

#[tokio::test]
async fn test_huge_arguments_are_rejected_not_clamped() {
    let tools = math_tools();
    let ctx = Arc::new(CallContext::new("c1", "add")) as Arc<dyn ToolContext>;

    let err = tools[0].execute(ctx.clone(), json!({"a": 1e19, "b": -1})).await.unwrap_err();
    assert!(matches!(err, PrimerError::Tool(ref m) if m == "argument 'a' is out of range"));

    let err = tools[0]
        .execute(ctx.clone(), json!({"a": 0, "b": 10_000_000_000_000_000_000u64}))
        .await
        .unwrap_err();
    assert!(matches!(err, PrimerError::Tool(ref m) if m == "argument 'b' is out of range"));

    assert_eq!(tools[0].execute(ctx, json!({"a": 4.0, "b": -1})).await.unwrap(), json!(3));
}

#[test]
fn test_tool_schema_lists_both_integers() {
    let decl = math_tools()[0].declaration();
    assert_eq!(decl["name"], "add");
    assert_eq!(decl["description"], "Add two integers.");
    assert_eq!(decl["parameters"]["properties"]["a"]["type"], "integer");
    assert_eq!(decl["parameters"]["properties"]["b"]["type"], "integer");
    assert_eq!(decl["parameters"]["required"], json!(["a", "b"]));
}

#[test]
fn test_should_continue() {
    let state = messages_input(&[call("c1", "add", 1.0, 2.0)]).unwrap();
    assert_eq!(should_continue(&state), "continue");

    let state = messages_input(&[Message::ai("3")]).unwrap();
    assert_eq!(should_continue(&state), "end");
}
