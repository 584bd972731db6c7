//! RAG agent: answers questions about a PDF by retrieving passages through a tool.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use primer_core::{CallContext, GenerateContentConfig, Llm, Message, Tool};
use primer_graph::{
    CompiledGraph, END, ExecutionConfig, Node, NodeContext, NodeOutput, START, StateGraph,
    StateSchema, TOOLS, last_message, messages_input, tool_output_text, tools_condition,
};
use primer_model::BoundModel;
use primer_rag::{
    EmbeddingProvider, InMemoryVectorStore, PdfLoader, RagConfig, RagPipeline, RetrieveTool,
    Retriever,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::Result;

pub const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

pub const SYSTEM_PROMPT: &str = "
You are an intelligent AI assistant who answers questions about stock market performance in 2024 based on the provided document.
Use the 'retrieve_tool' to fetch relevant information from the document when needed.
If you need to look up some information before asking a follow up question, you are allowed to use the 'retrieve_tool'.
Please always cite the specific parts of the document you used to formulate your answers.
";

pub const UNKNOWN_TOOL_REPLY: &str =
    "Incorrect Tool Name, Please Retry and Select tool from list of Available Tools.";

pub fn is_exit(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_WORDS.contains(&lower.as_str())
}

/// Where the corpus comes from and how it is indexed.
#[derive(Debug, Clone)]
pub struct RagAgentConfig {
    pub pdf_path: PathBuf,
    pub persist_dir: PathBuf,
    pub collection: String,
    /// Human-readable corpus name used in the retrieval tool's text.
    pub corpus: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagAgentConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("materials/Stock_Market_Performance_2024.pdf"),
            persist_dir: PathBuf::from("./output"),
            collection: "stock_market".to_string(),
            corpus: "Stock Market Performance 2024".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
        }
    }
}

/// Counts reported after indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub pages: usize,
    pub chunks: usize,
}

/// The `retriever_agent` node: runs each requested tool with the call's `query` argument.
///
/// Unknown tool names get a fixed reply instead of an error.
pub struct TakeAction {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl TakeAction {
    pub fn new(tools: &[Arc<dyn Tool>]) -> Self {
        Self { tools: tools.iter().map(|t| (t.name().to_string(), t.clone())).collect() }
    }
}

#[async_trait]
impl Node for TakeAction {
    fn name(&self) -> &str {
        "retriever_agent"
    }

    async fn execute(&self, ctx: &NodeContext) -> primer_graph::Result<NodeOutput> {
        let calls = last_message(&ctx.state).map(|m| m.tool_calls().to_vec()).unwrap_or_default();

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            let query = call.arg_str("query").unwrap_or("");
            let shown = if query.is_empty() { "No query provided" } else { query };
            info!(tool = %call.name, query = %shown, "calling tool");

            let content = match self.tools.get(&call.name) {
                Some(tool) => {
                    let call_ctx = Arc::new(CallContext::new(&call.id, &call.name));
                    let value = tool.execute(call_ctx, json!({ "query": query })).await?;
                    let text = tool_output_text(&value);
                    debug!(length = text.len(), "tool result");
                    text
                }
                None => {
                    warn!(tool = %call.name, "tool not found");
                    UNKNOWN_TOOL_REPLY.to_string()
                }
            };
            results.push(Message::tool(&call.id, &call.name, content));
        }

        info!("tool execution completed, back to the model");
        NodeOutput::new().with_messages(&results)
    }
}

/// START -> `llm`; `retriever_agent` runs the tool calls and loops back to `llm`.
pub fn build_graph(model: BoundModel, tools: &[Arc<dyn Tool>]) -> Result<CompiledGraph> {
    let graph = StateGraph::new(StateSchema::messages())
        .add_node_fn("llm", move |ctx| {
            let model = model.clone();
            async move {
                let response = model.invoke(ctx.messages()?).await?;
                NodeOutput::new().with_messages(&[response])
            }
        })
        .add_node(TakeAction::new(tools))
        .add_edge(START, "llm")
        .add_conditional_edges("llm", tools_condition, [(TOOLS, "retriever_agent"), (END, END)])
        .add_edge("retriever_agent", "llm")
        .compile()?;
    Ok(graph)
}

pub struct RagAgent {
    graph: CompiledGraph,
    report: IngestReport,
}

impl RagAgent {
    /// Load and index the PDF, then wire the retrieval tool into the graph.
    pub async fn setup(
        llm: Arc<dyn Llm>,
        embeddings: Arc<dyn EmbeddingProvider>,
        config: &RagAgentConfig,
    ) -> Result<Self> {
        let pages = PdfLoader::new(&config.pdf_path).load()?;
        info!(pages = pages.len(), "loaded pages from the PDF");

        let store = InMemoryVectorStore::persistent(&config.persist_dir).await?;
        let rag_config = RagConfig::builder()
            .chunk_size(config.chunk_size)
            .chunk_overlap(config.chunk_overlap)
            .top_k(config.top_k)
            .build()?;
        let pipeline = Arc::new(
            RagPipeline::builder()
                .config(rag_config)
                .embedding_provider(embeddings)
                .vector_store(Arc::new(store))
                .build()?,
        );
        pipeline.create_collection(&config.collection).await?;
        let chunks = pipeline.ingest_documents(&config.collection, &pages).await?;
        info!(collection = %config.collection, chunks = chunks.len(), "vector store ready");

        let retriever = Retriever::new(pipeline, config.collection.clone());
        let tools: Vec<Arc<dyn Tool>> =
            vec![Arc::new(RetrieveTool::new(retriever, config.corpus.clone()))];
        let model = BoundModel::new(llm)
            .bind_tools(&tools)
            .with_system(SYSTEM_PROMPT)
            .with_config(GenerateContentConfig { temperature: Some(0.0), ..Default::default() });

        Ok(Self {
            graph: build_graph(model, &tools)?,
            report: IngestReport { pages: pages.len(), chunks: chunks.len() },
        })
    }

    pub fn report(&self) -> IngestReport {
        self.report
    }

    /// Answer one question in a fresh conversation.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let input = messages_input(&[Message::human(question)])?;
        let result = self.graph.invoke(input, ExecutionConfig::default()).await?;
        Ok(last_message(&result).map(|m| m.content().to_string()).unwrap_or_default())
    }
}
