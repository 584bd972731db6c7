//! Drafter tests

use primer_agents::drafter::{DocumentStore, DrafterEvent, DrafterSession, drafter_tools};
use primer_core::{CallContext, Message, ToolCall, ToolContext};
use primer_model::MockLlm;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_update_replaces_document() {
    let store = DocumentStore::new(".");
    assert_eq!(store.content().await, "");
    assert_eq!(store.update("Hi Tom").await, "Document updated. Current content:\nHi Tom");
    assert_eq!(store.update("Hi Tim").await, "Document updated. Current content:\nHi Tim");
    assert_eq!(store.content().await, "Hi Tim");
}

#[tokio::test]
async fn test_save_appends_txt_extension() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path());
    store.update("Meeting at 10").await;

    assert_eq!(store.save("notes").await, "Document saved to notes.txt.");
    assert_eq!(store.save("agenda.txt").await, "Document saved to agenda.txt.");
    assert_eq!(std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "Meeting at 10");
    assert!(dir.path().join("agenda.txt").is_file());
}

#[tokio::test]
async fn test_save_failure_is_reported_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("missing-dir"));
    let result = store.save("notes").await;
    assert!(result.starts_with("Failed to save: "), "{result}");
}

#[tokio::test]
async fn test_tools_share_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path());
    let tools = drafter_tools(&store);
    let ctx = Arc::new(CallContext::new("c1", "update")) as Arc<dyn ToolContext>;

    let result = tools[0].execute(ctx.clone(), json!({"content": "Draft"})).await.unwrap();
    assert_eq!(result, json!("Document updated. Current content:\nDraft"));
    assert_eq!(store.content().await, "Draft");

    let result = tools[1].execute(ctx, json!({"filename": "draft"})).await.unwrap();
    assert_eq!(result, json!("Document saved to draft.txt."));
}

#[tokio::test]
async fn test_session_updates_then_saves() {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(
        MockLlm::new("mock")
            .with_message(Message::ai_with_tool_calls(
                "Updating the draft.",
                vec![ToolCall::new("c1", "update", json!({"content": "Hello Tom"}))],
            ))
            .with_message(Message::ai("The document now greets Tom."))
            .with_message(Message::ai_with_tool_calls(
                "",
                vec![ToolCall::new("c2", "save", json!({"filename": "letter"}))],
            )),
    );
    let mut session = DrafterSession::new(llm.clone(), DocumentStore::new(dir.path())).unwrap();

    let events = session.send("Write a greeting to Tom").await.unwrap();
    assert_eq!(
        events,
        vec![
            DrafterEvent::AiText("Updating the draft.".to_string()),
            DrafterEvent::ToolsUsed(vec!["update".to_string()]),
            DrafterEvent::ToolResult("Document updated. Current content:\nHello Tom".to_string()),
            DrafterEvent::AiText("The document now greets Tom.".to_string()),
        ]
    );
    assert!(!session.is_finished());
    assert_eq!(session.history().len(), 4);

    // The prompt of the second call already shows the updated document.
    let requests = llm.requests();
    assert!(requests[0].messages[0].content().contains("---\n\n---"));
    assert!(requests[1].messages[0].content().contains("---\nHello Tom\n---"));

    let events = session.send("Save it as letter").await.unwrap();
    assert_eq!(
        events,
        vec![
            DrafterEvent::ToolsUsed(vec!["save".to_string()]),
            DrafterEvent::ToolResult("Document saved to letter.txt.".to_string()),
            DrafterEvent::Saved,
        ]
    );
    assert!(session.is_finished());
    assert_eq!(std::fs::read_to_string(dir.path().join("letter.txt")).unwrap(), "Hello Tom");

    // The run stops at the save result, so the model is not called again.
    assert_eq!(llm.requests().len(), 3);
    assert_eq!(requests[1].messages.len(), 4);
    assert_eq!(llm.requests()[2].messages.len(), 6);
}
