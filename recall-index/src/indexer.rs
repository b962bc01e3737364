//! Incremental file indexing.
//!
//! Orchestrates the pipeline: read a file, fingerprint it, chunk it, embed
//! the chunks, and replace the file's records in the store. Replacement is
//! always delete-then-insert over the whole file; records are never patched
//! per chunk, so all records for a path carry the same fingerprint.

use crate::chunker::{ChunkingConfig, chunk_text};
use crate::fingerprint::fingerprint;
use crate::store::{ChunkRecord, VectorStore};
use crate::walker::FileWalker;
use anyhow::Result;
use recall_embed::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Why a file was passed over rather than indexed. Skips are expected
/// outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The path does not exist or is not a regular file.
    #[serde(rename = "not a file")]
    NotAFile,
    /// The file's bytes are not valid UTF-8.
    #[serde(rename = "not text")]
    NotText,
    /// The stored fingerprint matches the current content.
    #[serde(rename = "unchanged")]
    Unchanged,
    /// Chunking produced nothing (empty or all-whitespace file).
    #[serde(rename = "empty")]
    Empty,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::NotAFile => "not a file",
            SkipReason::NotText => "not text",
            SkipReason::Unchanged => "unchanged",
            SkipReason::Empty => "empty",
        };
        f.write_str(s)
    }
}

/// Result of indexing one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndexOutcome {
    Indexed { path: String, chunks: usize },
    Skipped { path: String, reason: SkipReason },
}

/// Per-file entry in a directory indexing summary. Errors are captured here
/// instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileReport {
    Indexed { path: String, chunks: usize },
    Skipped { path: String, reason: SkipReason },
    Error { path: String, error: String },
}

impl From<IndexOutcome> for FileReport {
    fn from(outcome: IndexOutcome) -> Self {
        match outcome {
            IndexOutcome::Indexed { path, chunks } => FileReport::Indexed { path, chunks },
            IndexOutcome::Skipped { path, reason } => FileReport::Skipped { path, reason },
        }
    }
}

/// Totals and per-file reports for one directory indexing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub indexed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub files: Vec<FileReport>,
}

/// Indexes files into a vector store via an embedding provider.
///
/// The store and embedder are shared collaborators; the indexer itself holds
/// no per-file state. Callers are expected to serialize indexing of the same
/// path.
#[derive(Clone)]
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunking: ChunkingConfig,
}

impl Indexer {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_chunking(store, embedder, ChunkingConfig::default())
    }

    pub fn with_chunking(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            chunking,
        }
    }

    /// Index one file, replacing any records it already has in the store.
    ///
    /// Unchanged files (same fingerprint as stored) are skipped unless
    /// `force` is set. When the file does get (re-)indexed, its existing
    /// records are deleted before the new ones are inserted; the two steps
    /// are not one transaction, so a crash in between loses the file from
    /// the index until the next run.
    pub async fn index_file(&self, path: &Path, force: bool) -> Result<IndexOutcome> {
        let display_path = path.display().to_string();

        let canonical = match tokio::fs::canonicalize(path).await {
            Ok(p) => p,
            Err(_) => {
                return Ok(IndexOutcome::Skipped {
                    path: display_path,
                    reason: SkipReason::NotAFile,
                });
            }
        };
        let is_file = tokio::fs::metadata(&canonical)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Ok(IndexOutcome::Skipped {
                path: display_path,
                reason: SkipReason::NotAFile,
            });
        }

        let abs_path = canonical.to_string_lossy().into_owned();
        let bytes = match tokio::fs::read(&canonical).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return Ok(IndexOutcome::Skipped {
                    path: abs_path,
                    reason: SkipReason::NotAFile,
                });
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                return Ok(IndexOutcome::Skipped {
                    path: abs_path,
                    reason: SkipReason::NotText,
                });
            }
        };

        let current_hash = fingerprint(text.as_bytes());
        let existing = self.store.get_by_path(&abs_path).await?;

        if !existing.is_empty() {
            if !force && existing[0].file_hash == current_hash {
                tracing::debug!("Unchanged, skipping: {abs_path}");
                return Ok(IndexOutcome::Skipped {
                    path: abs_path,
                    reason: SkipReason::Unchanged,
                });
            }
            // Stale records go first, whether the re-index was forced or
            // triggered by a content change. Record ids embed the chunk
            // index, so inserting over leftovers would collide or leave
            // orphans from a longer previous chunking.
            let stale_ids: Vec<String> = existing.into_iter().map(|r| r.id).collect();
            self.store.delete(&stale_ids).await?;
        }

        let chunks = chunk_text(&text, &self.chunking)?;
        if chunks.is_empty() {
            return Ok(IndexOutcome::Skipped {
                path: abs_path,
                reason: SkipReason::Empty,
            });
        }

        let embeddings = self.embedder.embed_texts(&chunks).await?;

        let filename = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings.embeddings)
            .enumerate()
            .map(|(chunk_idx, (text, embedding))| ChunkRecord {
                id: ChunkRecord::make_id(&abs_path, chunk_idx),
                path: abs_path.clone(),
                filename: filename.clone(),
                chunk_idx,
                file_hash: current_hash.clone(),
                text,
                embedding,
            })
            .collect();

        let chunk_count = records.len();
        self.store.add(&records).await?;

        tracing::info!("Indexed {abs_path} ({chunk_count} chunks)");
        Ok(IndexOutcome::Indexed {
            path: abs_path,
            chunks: chunk_count,
        })
    }

    /// Index every candidate file under `root`.
    ///
    /// Traversal policy comes from [`FileWalker`]; `extensions` overrides
    /// the default set when given. A failure on one file is recorded in the
    /// summary and the batch continues.
    pub async fn index_directory(
        &self,
        root: &Path,
        extensions: Option<&[String]>,
        force: bool,
    ) -> Result<DirectorySummary> {
        let walker = match extensions {
            Some(exts) => FileWalker::new(exts),
            None => FileWalker::default(),
        };
        let candidates: Vec<_> = walker.walk(root).collect();
        tracing::info!(
            "Indexing {} candidate files under {}",
            candidates.len(),
            root.display()
        );

        let mut summary = DirectorySummary::default();
        for path in candidates {
            match self.index_file(&path, force).await {
                Ok(outcome) => {
                    match &outcome {
                        IndexOutcome::Indexed { .. } => summary.indexed += 1,
                        IndexOutcome::Skipped { .. } => summary.skipped += 1,
                    }
                    summary.files.push(outcome.into());
                }
                Err(error) => {
                    tracing::warn!("Failed to index {}: {error:#}", path.display());
                    summary.errors += 1;
                    summary.files.push(FileReport::Error {
                        path: path.display().to_string(),
                        error: error.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("chunking", &self.chunking)
            .finish()
    }
}
