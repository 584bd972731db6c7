//! Vector store trait.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// Storage for embedded chunks, searchable by similarity.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a collection if it does not exist yet.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert chunks, replacing any with the same id.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// The `top_k` chunks most similar to `embedding`, best first.
    async fn search(&self, collection: &str, embedding: &[f32], top_k: usize)
    -> Result<Vec<SearchResult>>;
}
