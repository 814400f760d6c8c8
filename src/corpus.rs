//! Document corpus loading.
//!
//! Scans a flat directory of background documents and extracts plain text
//! from each supported file. The resulting corpus is read-only for the
//! process lifetime and is injected verbatim into every system prompt.
//!
//! Supported formats:
//! - `.pdf` - text extracted per page and concatenated in page order
//! - `.txt` / `.md` - read as UTF-8
//!
//! Anything else is skipped. The document key is the file name up to the
//! first `.`, so `resume.pdf` and `resume.v2.pdf` both map to `resume`
//! (last writer wins on collision).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read document directory {path}: {source}")]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to extract text from {path}: {source}")]
    Pdf { path: PathBuf, source: lopdf::Error },
}

/// The loaded set of background documents, keyed by document name.
#[derive(Debug, Clone, Default)]
pub struct DocumentCorpus {
    documents: BTreeMap<String, String>,
}

impl DocumentCorpus {
    /// Load every supported document in `dir`.
    ///
    /// # Errors
    ///
    /// A missing directory or an unreadable/corrupt document is an error;
    /// the caller treats either as fatal at startup. There is no partial
    /// loading.
    pub fn load(dir: &Path) -> Result<Self, CorpusError> {
        let entries = std::fs::read_dir(dir).map_err(|e| CorpusError::Dir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut documents = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|e| CorpusError::Dir {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(key) = document_key(&file_name) else {
                continue;
            };

            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();

            let text = match extension.as_str() {
                "pdf" => extract_pdf_text(&path)?,
                "txt" | "md" => {
                    std::fs::read_to_string(&path).map_err(|e| CorpusError::Read {
                        path: path.clone(),
                        source: e,
                    })?
                }
                _ => {
                    tracing::debug!("Skipping unsupported document: {}", path.display());
                    continue;
                }
            };

            tracing::info!(
                "Loaded document '{}' ({} chars) from {}",
                key,
                text.len(),
                path.display()
            );
            documents.insert(key, text);
        }

        Ok(Self { documents })
    }

    /// Look up a document's text by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.documents.get(key).map(String::as_str)
    }

    /// Iterate documents in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Build a corpus directly from key/text pairs (useful for testing).
    pub fn from_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            documents: documents
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Document key: the file name up to the first `.`. Dotfiles and empty
/// names produce no key.
fn document_key(file_name: &str) -> Option<String> {
    let key = file_name.split('.').next().unwrap_or_default();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Extract text from a PDF, page by page, concatenated in page order.
fn extract_pdf_text(path: &Path) -> Result<String, CorpusError> {
    let doc = lopdf::Document::load(path).map_err(|e| CorpusError::Pdf {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        let page_text = doc
            .extract_text(&[*page_number])
            .map_err(|e| CorpusError::Pdf {
                path: path.to_path_buf(),
                source: e,
            })?;
        text.push_str(&page_text);
    }
    Ok(text)
}
