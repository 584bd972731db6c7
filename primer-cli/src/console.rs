//! Interactive loops for each tutorial.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use primer_agents::chat::{self, ChatSession, Transcript};
use primer_agents::drafter::{self, DocumentStore, DrafterEvent, DrafterSession};
use primer_agents::rag::{self, RagAgent, RagAgentConfig};
use primer_agents::react::ReactAgent;
use primer_core::Llm;
use primer_rag::EmbeddingProvider;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Line reader that treats Ctrl-C and EOF as the end of input.
pub struct Console {
    editor: DefaultEditor,
}

impl Console {
    pub fn new() -> Result<Self> {
        Ok(Self { editor: DefaultEditor::new()? })
    }

    /// The next line, or `None` when the user is done.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(&line)?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub async fn run_chat(llm: Arc<dyn Llm>, log_file: &Path) -> Result<()> {
    let mut console = Console::new()?;
    let mut session = ChatSession::new(llm)?;

    while let Some(input) = console.read_line("Enter: ")? {
        if chat::is_exit(&input) {
            break;
        }
        match session.send(&input).await {
            Ok(reply) => println!("AI: {reply}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Transcript::write(log_file, session.history()).await?;
    println!("Conversation history has been logged to {}", log_file.display());
    Ok(())
}

pub async fn run_react(llm: Arc<dyn Llm>, query: &str) -> Result<()> {
    let agent = ReactAgent::new(llm)?;
    let messages = agent.run_stream(query);
    futures::pin_mut!(messages);
    while let Some(message) = messages.next().await {
        println!("{}", message?.pretty());
    }
    Ok(())
}

fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("'{name}'")).collect();
    format!("[{}]", quoted.join(", "))
}

pub async fn run_drafter(llm: Arc<dyn Llm>, output_dir: &Path) -> Result<()> {
    let mut console = Console::new()?;
    let mut session = DrafterSession::new(llm, DocumentStore::new(output_dir))?;

    println!("\n--- Drafter Document Agent ---\n");
    println!("AI: {}", drafter::GREETING);

    while let Some(input) = console.read_line("\nUser: ")? {
        if drafter::is_quit(&input) {
            break;
        }
        let events = match session.send(&input).await {
            Ok(events) => events,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };
        for event in events {
            match event {
                DrafterEvent::AiText(text) => println!("🤖 AI: {text}"),
                DrafterEvent::ToolsUsed(names) => {
                    println!("🛠️ USING TOOLS: {}", quoted_list(&names))
                }
                DrafterEvent::ToolResult(content) => println!("✅ Tool Result: {content}"),
                DrafterEvent::Saved => {
                    println!("\n--- Document Saved. Exiting... ---");
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

pub async fn run_rag(
    llm: Arc<dyn Llm>,
    embeddings: Arc<dyn EmbeddingProvider>,
    config: &RagAgentConfig,
) -> Result<()> {
    let agent = RagAgent::setup(llm, embeddings, config).await?;
    let report = agent.report();
    println!("Loaded {} pages from the PDF.", report.pages);
    println!("Created vector store with collection '{}'.", config.collection);

    let mut console = Console::new()?;
    println!("\n=== RAG AGENT ===");
    while let Some(input) = console.read_line("\nWhat is your question: ")? {
        if rag::is_exit(&input) {
            break;
        }
        match agent.ask(&input).await {
            Ok(answer) => {
                println!("\n=== AGENT RESPONSE ===");
                println!("{answer}");
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_list() {
        assert_eq!(quoted_list(&["update".to_string()]), "['update']");
        assert_eq!(quoted_list(&["update".to_string(), "save".to_string()]), "['update', 'save']");
    }
}
