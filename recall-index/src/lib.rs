//! Core semantic indexing: chunking, fingerprinting, traversal, storage,
//! and search over workspace text files.
//!
//! The pipeline reads a file, splits it into overlapping character windows
//! ([`chunker`]), fingerprints the content for change detection
//! ([`fingerprint`]), embeds each window through a [`recall_embed`]
//! provider, and stores the vectors ([`store`]). [`indexer`] orchestrates
//! incremental re-indexing with wholesale per-file replacement; [`search`]
//! ranks stored chunks against a query by cosine similarity; [`walker`]
//! decides which files are candidates at all.

pub mod chunker;
pub mod fingerprint;
pub mod indexer;
pub mod search;
pub mod store;
pub mod testing;
pub mod walker;

pub use chunker::{ChunkingConfig, chunk_text};
pub use fingerprint::fingerprint;
pub use indexer::{DirectorySummary, FileReport, IndexOutcome, Indexer, SkipReason};
pub use search::{SearchEngine, SearchHit};
pub use store::{ChunkRecord, SqliteVectorStore, VectorStore};
pub use walker::{DEFAULT_EXTENSIONS, FileWalker};
