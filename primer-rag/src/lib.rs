//! # primer-rag
//!
//! Retrieval for the agent-primer RAG tutorial.
//!
//! The pieces are trait-based so tests can swap the embedding API for a
//! deterministic provider:
//!
//! - [`PdfLoader`] - One [`Document`] per PDF page
//! - [`RecursiveChunker`] - Paragraph, line, word, then character splitting with overlap
//! - [`EmbeddingProvider`] / [`GeminiEmbeddingProvider`] - Text to vectors
//! - [`VectorStore`] / [`InMemoryVectorStore`] - Cosine search, optionally persisted to JSON
//! - [`RagPipeline`] - Ingest and query orchestration
//! - [`Retriever`] / [`RetrieveTool`] - Retrieval for a single collection, and as a tool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use primer_rag::*;
//! use std::sync::Arc;
//!
//! let pages = PdfLoader::new("materials/Stock_Market_Performance_2024.pdf").load()?;
//! let pipeline = Arc::new(
//!     RagPipeline::builder()
//!         .embedding_provider(Arc::new(GeminiEmbeddingProvider::new(api_key)?))
//!         .vector_store(Arc::new(InMemoryVectorStore::persistent("./output").await?))
//!         .build()?,
//! );
//! pipeline.create_collection("stock_market").await?;
//! pipeline.ingest_documents("stock_market", &pages).await?;
//!
//! let retriever = Retriever::new(pipeline, "stock_market");
//! let tool = RetrieveTool::new(retriever, "Stock Market Performance 2024");
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod inmemory;
pub mod loader;
pub mod pipeline;
pub mod retriever;
pub mod tool;
pub mod vectorstore;

pub use chunking::{Chunker, DEFAULT_SEPARATORS, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use gemini::{DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, GeminiEmbeddingProvider};
pub use inmemory::{InMemoryVectorStore, cosine_similarity};
pub use loader::PdfLoader;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use tool::{RETRIEVE_TOOL_NAME, RetrieveTool};
pub use vectorstore::VectorStore;
