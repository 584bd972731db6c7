//! In-memory vector store with optional JSON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "memory";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Collection {
    dimensions: usize,
    chunks: Vec<Chunk>,
}

/// A [`VectorStore`] that keeps chunks in memory and ranks them by cosine similarity.
///
/// With [`persistent`](Self::persistent), every collection is mirrored to
/// `<dir>/<collection>.json` after each write and reloaded by
/// [`create_collection`](VectorStore::create_collection), so a second run over
/// the same directory starts with the chunks of the first.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
    persist_dir: Option<PathBuf>,
    /// Held from a change until its file write lands, so files on disk never
    /// go back to an older snapshot.
    writes: Mutex<()>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store backed by `dir`, which is created when missing.
    pub async fn persistent(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!(path = %dir.display(), "using persistent vector store");
        Ok(Self { persist_dir: Some(dir), ..Self::default() })
    }

    pub fn persist_dir(&self) -> Option<&Path> {
        self.persist_dir.as_deref()
    }

    /// Number of chunks stored in `collection`.
    pub async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        Ok(Self::get(&collections, collection)?.chunks.len())
    }

    fn collection_path(&self, name: &str) -> Option<PathBuf> {
        self.persist_dir.as_ref().map(|dir| dir.join(format!("{name}.json")))
    }

    fn missing(name: &str) -> RagError {
        RagError::VectorStoreError {
            backend: BACKEND.to_string(),
            message: format!("collection '{name}' does not exist"),
        }
    }

    fn get<'a>(collections: &'a HashMap<String, Collection>, name: &str) -> Result<&'a Collection> {
        collections.get(name).ok_or_else(|| Self::missing(name))
    }

    async fn save(&self, name: &str, collection: &Collection) -> Result<()> {
        if let Some(path) = self.collection_path(name) {
            let bytes = serde_json::to_vec(collection)?;
            tokio::fs::write(&path, bytes).await?;
            debug!(path = %path.display(), chunks = collection.chunks.len(), "saved collection");
        }
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Option<Collection>> {
        let Some(path) = self.collection_path(name) else {
            return Ok(None);
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let collection: Collection = serde_json::from_slice(&bytes)?;
                let chunks = collection.chunks.len();
                debug!(path = %path.display(), chunks, "loaded collection");
                Ok(Some(collection))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Cosine similarity of two vectors; zero when either has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.collections.read().await.contains_key(name) {
            return Ok(());
        }
        let collection =
            self.load(name).await?.unwrap_or(Collection { dimensions, chunks: Vec::new() });
        self.collections.write().await.entry(name.to_string()).or_insert(collection);
        debug!(collection = name, dimensions, "created collection");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let _writing = self.writes.lock().await;
        self.collections.write().await.remove(name);
        if let Some(path) = self.collection_path(name) {
            match tokio::fs::remove_file(&path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }
        debug!(collection = name, "deleted collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let _writing = self.writes.lock().await;
        let snapshot = {
            let mut collections = self.collections.write().await;
            let entry = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;

            let expected = entry.dimensions;
            let mismatched = |c: &&Chunk| expected != 0 && c.embedding.len() != expected;
            if let Some(bad) = chunks.iter().find(mismatched) {
                return Err(RagError::VectorStoreError {
                    backend: BACKEND.to_string(),
                    message: format!(
                        "chunk '{}' has {} dimensions, collection '{collection}' expects \
                         {expected}",
                        bad.id,
                        bad.embedding.len(),
                    ),
                });
            }
            for chunk in chunks {
                match entry.chunks.iter_mut().find(|existing| existing.id == chunk.id) {
                    Some(existing) => *existing = chunk.clone(),
                    None => entry.chunks.push(chunk.clone()),
                }
            }
            entry.clone()
        };

        self.save(collection, &snapshot).await?;
        debug!(collection, count = chunks.len(), "upserted chunks");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let _writing = self.writes.lock().await;
        let snapshot = {
            let mut collections = self.collections.write().await;
            let entry = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
            entry.chunks.retain(|chunk| !ids.contains(&chunk.id.as_str()));
            entry.clone()
        };
        self.save(collection, &snapshot).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let entry = Self::get(&collections, collection)?;

        let mut results: Vec<SearchResult> = entry
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(embedding, &chunk.embedding),
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        debug!(collection, top_k, found = results.len(), "searched collection");
        Ok(results)
    }
}
