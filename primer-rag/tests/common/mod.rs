#![allow(dead_code)]

use async_trait::async_trait;
use primer_rag::{Chunk, EmbeddingProvider};
use std::collections::HashMap;

pub const VOCABULARY: [&str; 4] = ["nvidia", "apple", "bonds", "tesla"];

/// Counts vocabulary words, so texts sharing keywords score as similar.
pub struct KeywordEmbedding;

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    VOCABULARY.iter().map(|word| lower.matches(word).count() as f32).collect()
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedding {
    async fn embed(&self, text: &str) -> primer_rag::Result<Vec<f32>> {
        Ok(keyword_vector(text))
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

pub fn chunk(id: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        document_id: "doc".to_string(),
        text: text.to_string(),
        embedding: keyword_vector(text),
        metadata: HashMap::new(),
    }
}
