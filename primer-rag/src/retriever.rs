//! A pipeline bound to one collection.

use std::sync::Arc;

use crate::document::SearchResult;
use crate::error::Result;
use crate::pipeline::RagPipeline;

#[derive(Clone)]
pub struct Retriever {
    pipeline: Arc<RagPipeline>,
    collection: String,
}

impl Retriever {
    pub fn new(pipeline: Arc<RagPipeline>, collection: impl Into<String>) -> Self {
        Self { pipeline, collection: collection.into() }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Similarity search for `query`, returning at most the pipeline's `top_k` results.
    pub async fn invoke(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.pipeline.query(&self.collection, query).await
    }
}
