//! Similarity search over the stored chunks.

use crate::store::VectorStore;
use anyhow::Result;
use recall_embed::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One search result, nearest matches first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// `1 - cosine distance`: 1.0 is identical direction, negative values
    /// are possible for opposing vectors. Only meaningful relative to other
    /// hits from the same query.
    pub score: f32,
    pub text: String,
    pub path: String,
    pub filename: String,
    pub chunk_idx: usize,
}

/// Embeds a query and ranks stored chunks against it.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SearchEngine {
    pub const DEFAULT_LIMIT: usize = 5;

    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// The `limit` chunks most similar to `query`. An empty store yields an
    /// empty result, not an error.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let embedding = self.embedder.embed_text(query).await?;
        let matches = self.store.query(&embedding, limit).await?;

        let hits = matches
            .into_iter()
            .map(|(record, distance)| SearchHit {
                id: record.id,
                score: 1.0 - distance,
                text: record.text,
                path: record.path,
                filename: record.filename,
                chunk_idx: record.chunk_idx,
            })
            .collect();
        Ok(hits)
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::Indexer;
    use crate::store::SqliteVectorStore;
    use crate::testing::StubEmbedder;
    use std::fs;

    async fn engine_with_files(files: &[(&str, &str)]) -> Result<SearchEngine> {
        let dir = tempfile::tempdir()?;
        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::open_memory().await?);
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::default());

        let indexer = Indexer::new(store.clone(), embedder.clone());
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::write(&path, content)?;
            indexer.index_file(&path, false).await?;
        }

        Ok(SearchEngine::new(store, embedder))
    }

    #[tokio::test]
    async fn empty_store_returns_no_hits() -> Result<()> {
        let engine = engine_with_files(&[]).await?;
        let hits = engine.search("anything", 5).await?;
        assert!(hits.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn exact_text_ranks_first_with_top_score() -> Result<()> {
        let engine = engine_with_files(&[
            ("a.md", "the quick brown fox"),
            ("b.md", "zzzz 9999 ####"),
        ])
        .await?;

        let hits = engine.search("the quick brown fox", 5).await?;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].filename, "a.md");
        assert_eq!(hits[0].chunk_idx, 0);
        assert!(hits[0].score > hits[1].score);
        // Identical text embeds identically, so the score is ~1.
        assert!(hits[0].score > 0.99, "score was {}", hits[0].score);
        Ok(())
    }

    #[tokio::test]
    async fn limit_caps_the_result_count() -> Result<()> {
        let engine = engine_with_files(&[
            ("a.md", "alpha"),
            ("b.md", "beta"),
            ("c.md", "gamma"),
        ])
        .await?;

        let hits = engine.search("alpha", 2).await?;
        assert_eq!(hits.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn hits_carry_record_metadata() -> Result<()> {
        let engine = engine_with_files(&[("notes.md", "remember the milk")]).await?;
        let hits = engine.search("remember the milk", 1).await?;

        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert!(hit.id.ends_with("::0"));
        assert!(hit.path.ends_with("notes.md"));
        assert_eq!(hit.filename, "notes.md");
        assert_eq!(hit.text, "remember the milk");
        Ok(())
    }
}
