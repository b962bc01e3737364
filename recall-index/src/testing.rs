//! Deterministic test doubles.
//!
//! [`StubEmbedder`] stands in for the real model in tests so nothing is
//! downloaded and embeddings are reproducible. It hashes bytes into a small
//! normalized histogram: identical texts embed identically, and texts
//! sharing characters land closer together than unrelated ones. That is
//! enough signal to exercise ranking without a model.

use async_trait::async_trait;
use half::f16;
use recall_embed::{EmbedError, EmbeddingProvider, EmbeddingResult};

#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self { dimension: 32 }
    }
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f16> {
        let mut histogram = vec![0.0f32; self.dimension];
        for byte in text.bytes() {
            histogram[byte as usize % self.dimension] += 1.0;
        }

        let norm: f32 = histogram.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut histogram {
                *value /= norm;
            }
        }

        histogram.into_iter().map(f16::from_f32).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f16>, EmbedError> {
        Ok(self.embed_one(text))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult, EmbedError> {
        let embeddings = texts.iter().map(|t| self.embed_one(t)).collect();
        Ok(EmbeddingResult::new(embeddings))
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}
