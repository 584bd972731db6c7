//! Ingest-and-query orchestration.

use std::sync::Arc;

use tracing::{debug, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Chunks, embeds, and stores documents, then answers similarity queries over them.
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(GeminiEmbeddingProvider::new(api_key)?))
///     .vector_store(Arc::new(InMemoryVectorStore::new()))
///     .build()?;
///
/// pipeline.create_collection("stock_market").await?;
/// pipeline.ingest_documents("stock_market", &pages).await?;
/// let hits = pipeline.query("stock_market", "How did NVIDIA perform?").await?;
/// ```
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    pub async fn create_collection(&self, name: &str) -> Result<()> {
        self.vector_store.create_collection(name, self.embedding_provider.dimensions()).await
    }

    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.vector_store.delete_collection(name).await
    }

    pub async fn ingest(&self, collection: &str, document: &Document) -> Result<Vec<Chunk>> {
        self.ingest_documents(collection, std::slice::from_ref(document)).await
    }

    /// Chunk, embed, and upsert `documents`. Returns the stored chunks.
    pub async fn ingest_documents(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<Vec<Chunk>> {
        let mut chunks: Vec<Chunk> =
            documents.iter().flat_map(|doc| self.chunker.chunk(doc)).collect();
        if chunks.is_empty() {
            debug!(collection, documents = documents.len(), "nothing to ingest");
            return Ok(chunks);
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::PipelineError(format!(
                "embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(collection, &chunks).await?;
        info!(collection, documents = documents.len(), chunks = chunks.len(), "ingested documents");
        Ok(chunks)
    }

    /// The `top_k` chunks most similar to `query`, skipping any below the similarity threshold.
    pub async fn query(&self, collection: &str, query: &str) -> Result<Vec<SearchResult>> {
        let embedding = self.embedding_provider.embed(query).await?;
        let mut results =
            self.vector_store.search(collection, &embedding, self.config.top_k).await?;
        let threshold = self.config.similarity_threshold;
        results.retain(|result| result.score >= threshold);
        debug!(collection, results = results.len(), "query complete");
        Ok(results)
    }
}

#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the chunker. Defaults to a [`RecursiveChunker`] sized from the config.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector store is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        });
        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
