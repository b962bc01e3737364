//! Embedding layer for the recall semantic memory system.
//!
//! This crate wraps an ONNX sentence-embedding model (via `fastembed`) behind
//! the [`EmbeddingProvider`] trait so the indexing and search pipeline can
//! treat text-to-vector conversion as a black box. Embeddings are returned as
//! L2-normalized `half::f16` vectors, which halves storage size with no
//! measurable effect on cosine ranking.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recall_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};
//!
//! # async fn example() -> recall_embed::Result<()> {
//! let provider = FastEmbedProvider::create(EmbedConfig::default()).await?;
//! let vectors = provider.embed_texts(&["hello world".to_string()]).await?;
//! assert_eq!(vectors.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;

pub use config::EmbedConfig;
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, FastEmbedProvider};
