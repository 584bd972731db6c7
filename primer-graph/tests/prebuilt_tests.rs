//! ToolNode and tools_condition tests

use primer_core::{Message, PrimerError, Tool, ToolCall};
use primer_graph::{
    END, ExecutionConfig, GraphError, Node, NodeContext, START, StateGraph, StateSchema, ToolNode,
    messages_input, tools_condition,
};
use primer_tool::{FunctionTool, required_i64};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn math_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(FunctionTool::new("add", "Add two integers.", |_ctx, args| async move {
            Ok(json!(required_i64(&args, "a")? + required_i64(&args, "b")?))
        })),
        Arc::new(FunctionTool::new("echo", "Echo text.", |_ctx, args| async move {
            Ok(args["text"].clone())
        })),
    ]
}

fn ctx_with(messages: &[Message]) -> NodeContext {
    NodeContext::new(messages_input(messages).unwrap(), ExecutionConfig::default(), 0)
}

#[tokio::test]
async fn test_tool_node_runs_calls_in_order() {
    let node = ToolNode::new("tools", math_tools());
    let ctx = ctx_with(&[
        Message::human("234 + 5678, and say hi"),
        Message::ai_with_tool_calls(
            "",
            vec![
                ToolCall::new("c1", "add", json!({"a": 234, "b": 5678})),
                ToolCall::new("c2", "echo", json!({"text": "hi"})),
            ],
        ),
    ]);

    let output = node.execute(&ctx).await.unwrap();
    let messages: Vec<Message> =
        serde_json::from_value(output.updates["messages"].clone()).unwrap();
    assert_eq!(
        messages,
        vec![Message::tool("c1", "add", "5912"), Message::tool("c2", "echo", "hi")]
    );
}

#[tokio::test]
async fn test_tool_errors_become_messages() {
    let node = ToolNode::new("tools", math_tools());
    let ctx = ctx_with(&[Message::ai_with_tool_calls(
        "",
        vec![
            ToolCall::new("c1", "add", json!({"a": 1})),
            ToolCall::new("c2", "divide", json!({"a": 1, "b": 0})),
        ],
    )]);

    let output = node.execute(&ctx).await.unwrap();
    let messages: Vec<Message> =
        serde_json::from_value(output.updates["messages"].clone()).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0].content(),
        "Error: Tool error: missing argument 'b'\n Please fix your mistakes."
    );
    assert_eq!(messages[1].content(), "Error: divide is not a valid tool, try one of [add, echo].");
}

#[tokio::test]
async fn test_tool_node_requires_ai_message() {
    let node = ToolNode::new("tools", math_tools());
    let err = node.execute(&ctx_with(&[Message::human("hi")])).await.unwrap_err();
    assert!(matches!(err, GraphError::Core(PrimerError::Tool(_))));
}

#[tokio::test]
async fn test_react_loop_with_tool_node() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let graph = StateGraph::new(StateSchema::messages())
        .add_node_fn("agent", move |ctx| {
            let counter = counter.clone();
            async move {
                let reply = match counter.fetch_add(1, Ordering::SeqCst) {
                    0 => Message::ai_with_tool_calls(
                        "",
                        vec![ToolCall::new("c1", "add", json!({"a": 2, "b": 3}))],
                    ),
                    _ => {
                        let last = ctx.messages()?.last().cloned();
                        let answer = last.map(|m| m.content().to_string()).unwrap_or_default();
                        Message::ai(format!("The answer is {answer}"))
                    }
                };
                primer_graph::NodeOutput::new().with_messages(&[reply])
            }
        })
        .add_node(ToolNode::new("tools", math_tools()))
        .add_edge(START, "agent")
        .add_conditional_edges("agent", tools_condition, [("tools", "tools"), (END, END)])
        .add_edge("tools", "agent")
        .compile()
        .unwrap();

    let result = graph
        .invoke(messages_input(&[Message::human("2 + 3")]).unwrap(), ExecutionConfig::default())
        .await
        .unwrap();
    let messages: Vec<Message> = serde_json::from_value(result["messages"].clone()).unwrap();

    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], Message::tool("c1", "add", "5"));
    assert_eq!(messages[3], Message::ai("The answer is 5"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
