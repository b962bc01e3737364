//! Vector storage abstraction.
//!
//! The index talks to storage through the [`VectorStore`] trait so that the
//! SQLite backend stays swappable and tests can run against an in-memory
//! database. One record per chunk; a file's records are always replaced
//! wholesale, never patched individually.

mod sqlite_store;

pub use sqlite_store::SqliteVectorStore;

use anyhow::Result;
use async_trait::async_trait;
use half::f16;
use serde::{Deserialize, Serialize};

/// One stored chunk: text, embedding, and the metadata needed to locate it
/// in its source file and to detect staleness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// `"{absolute_path}::{chunk_idx}"`, unique across files and positions.
    pub id: String,
    /// Absolute path of the source file.
    pub path: String,
    pub filename: String,
    /// 0-based position of this chunk within the file.
    pub chunk_idx: usize,
    /// Hex blake3 fingerprint of the whole file at indexing time. All
    /// records for one path carry the same value.
    pub file_hash: String,
    pub text: String,
    #[serde(skip)]
    pub embedding: Vec<f16>,
}

impl ChunkRecord {
    /// The record id for a chunk of `path` at position `chunk_idx`.
    pub fn make_id(path: &str, chunk_idx: usize) -> String {
        format!("{path}::{chunk_idx}")
    }
}

/// Storage backend for chunk records.
///
/// `query` returns cosine *distances* (`1 - cos`, in `[0, 2]`), nearest
/// first; callers convert to scores as they see fit.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// All records whose `path` matches exactly.
    async fn get_by_path(&self, path: &str) -> Result<Vec<ChunkRecord>>;

    /// Insert a batch of records in one transaction.
    async fn add(&self, records: &[ChunkRecord]) -> Result<()>;

    /// Delete records by id. Unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> Result<()>;

    /// The `limit` records nearest to `embedding` by cosine distance.
    async fn query(
        &self,
        embedding: &[f16],
        limit: usize,
    ) -> Result<Vec<(ChunkRecord, f32)>>;

    /// Total number of stored records.
    async fn count(&self) -> Result<u64>;

    /// Remove every record.
    async fn clear(&self) -> Result<()>;
}

/// Cosine distance `1 - cos(a, b)` between two embedding vectors.
///
/// Vectors of mismatched dimension or zero magnitude compare as maximally
/// unrelated (similarity 0, distance 1).
pub(crate) fn cosine_distance(a: &[f16], b: &[f16]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = x.to_f32();
        let y = y.to_f32();
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}
