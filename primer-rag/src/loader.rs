//! PDF loading.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::Document;
use crate::error::{RagError, Result};

/// Loads a PDF as one [`Document`] per page.
///
/// Each document carries `source` (the path as given) and `page`
/// (0-based) metadata.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Document>> {
        let source = self.path.display().to_string();
        if !self.path.is_file() {
            return Err(RagError::FileNotFound(source));
        }

        let pdf = lopdf::Document::load(&self.path)
            .map_err(|e| RagError::LoadError(format!("{source}: {e}")))?;

        let mut documents = Vec::new();
        for (index, page_number) in pdf.get_pages().into_keys().enumerate() {
            let text = pdf
                .extract_text(&[page_number])
                .map_err(|e| RagError::LoadError(format!("{source} page {page_number}: {e}")))?;
            debug!(page = index, chars = text.len(), "extracted page text");
            documents.push(
                Document::new(format!("{source}#page={index}"), text)
                    .with_metadata("source", source.clone())
                    .with_metadata("page", index.to_string())
                    .with_source_uri(source.clone()),
            );
        }

        info!(path = %source, pages = documents.len(), "loaded PDF");
        Ok(documents)
    }
}
