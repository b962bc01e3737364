//! Shared collaborator wiring.

use anyhow::Result;
use recall_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};
use recall_index::{Indexer, SearchEngine, SqliteVectorStore, VectorStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs: the store, the embedder, and the engines
/// built on top of them.
///
/// Constructed once per session (by `init` or a one-shot subcommand) and
/// dropped when the session ends. Commands borrow it; there is no global
/// state anywhere.
#[derive(Clone)]
pub struct RecallContext {
    db_path: PathBuf,
    store: Arc<dyn VectorStore>,
    indexer: Indexer,
    search: SearchEngine,
}

impl RecallContext {
    /// Open the store at `db_path` and load the embedding model.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::open(db_path).await?);
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(FastEmbedProvider::create(EmbedConfig::default()).await?);
        Ok(Self::from_parts(db_path, store, embedder))
    }

    /// Wire a context from pre-built collaborators. Tests use this to plug
    /// in an in-memory store and a stub embedder.
    pub fn from_parts(
        db_path: &Path,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            indexer: Indexer::new(store.clone(), embedder.clone()),
            search: SearchEngine::new(store.clone(), embedder),
            store,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}

impl std::fmt::Debug for RecallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecallContext")
            .field("db_path", &self.db_path)
            .finish()
    }
}
