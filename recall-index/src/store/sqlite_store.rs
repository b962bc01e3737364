//! SQLite-backed vector store.
//!
//! Chunks live in a single `chunks` table keyed by the position-qualified
//! record id; embeddings are stored as f16 BLOBs. Similarity queries load
//! every stored embedding and rank in process, which is the right trade for
//! a workspace-scale index (thousands of chunks, not millions).

use super::{ChunkRecord, VectorStore, cosine_distance};
use anyhow::Result;
use async_trait::async_trait;
use half::f16;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;

#[derive(Clone, Debug)]
pub struct SqliteVectorStore {
    pool: SqlitePool,
}

impl SqliteVectorStore {
    /// Open (creating if missing) a persistent store at `db_path`. Parent
    /// directories are created as needed.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5))
                .create_if_missing(true),
        )
        .await?;
        Self::new_with_pool(pool).await
    }

    /// Open an in-memory store, for tests.
    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        Self::new_with_pool(pool).await
    }

    async fn new_with_pool(pool: SqlitePool) -> Result<Self> {
        Self::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                path TEXT NOT NULL,
                filename TEXT NOT NULL,
                chunk_idx INTEGER NOT NULL,
                file_hash TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_path ON chunks(path)")
            .execute(pool)
            .await?;

        Ok(())
    }

    fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> ChunkRecord {
        let chunk_idx: i64 = row.get("chunk_idx");
        let embedding_bytes: Vec<u8> = row.get("embedding");
        let embedding = bytemuck::cast_slice::<u8, f16>(&embedding_bytes).to_vec();

        ChunkRecord {
            id: row.get("id"),
            path: row.get("path"),
            filename: row.get("filename"),
            chunk_idx: chunk_idx as usize,
            file_hash: row.get("file_hash"),
            text: row.get("content"),
            embedding,
        }
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn get_by_path(&self, path: &str) -> Result<Vec<ChunkRecord>> {
        let rows = sqlx::query(
            "SELECT id, path, filename, chunk_idx, file_hash, content, embedding
             FROM chunks WHERE path = ?1 ORDER BY chunk_idx",
        )
        .bind(path)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::record_from_row).collect())
    }

    async fn add(&self, records: &[ChunkRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            let embedding_bytes = bytemuck::cast_slice::<f16, u8>(&record.embedding);

            sqlx::query(
                r#"
                INSERT INTO chunks (id, path, filename, chunk_idx, file_hash, content, embedding)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&record.id)
            .bind(&record.path)
            .bind(&record.filename)
            .bind(record.chunk_idx as i64)
            .bind(&record.file_hash)
            .bind(&record.text)
            .bind(embedding_bytes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("DELETE FROM chunks WHERE id IN ({placeholders})");

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        query.execute(&self.pool).await?;

        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f16],
        limit: usize,
    ) -> Result<Vec<(ChunkRecord, f32)>> {
        let rows = sqlx::query(
            "SELECT id, path, filename, chunk_idx, file_hash, content, embedding FROM chunks",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut scored: Vec<(ChunkRecord, f32)> = rows
            .iter()
            .map(Self::record_from_row)
            .map(|record| {
                let distance = cosine_distance(embedding, &record.embedding);
                (record, distance)
            })
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM chunks").execute(&self.pool).await?;
        Ok(())
    }
}
