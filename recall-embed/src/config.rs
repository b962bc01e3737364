//! Embedding model configuration

use crate::error::{EmbedError, Result};
use fastembed::EmbeddingModel;
use serde::{Deserialize, Serialize};

/// Configuration for an embedding provider.
///
/// The default model is `all-MiniLM-L6-v2`, a small sentence-transformer that
/// is fast enough to embed whole workspaces on a laptop while still producing
/// useful similarity rankings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    model_name: String,
    batch_size: usize,
    normalize: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            model_name: "all-MiniLM-L6-v2".to_string(),
            batch_size: 16,
            normalize: true,
        }
    }
}

impl EmbedConfig {
    /// Create a configuration for a named model.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            ..Self::default()
        }
    }

    /// Set how many texts are pushed through the model per inference call.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set whether embeddings are L2-normalized before being returned.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Resolve the configured model name to a built-in fastembed model.
    pub(crate) fn embedding_model(&self) -> Result<EmbeddingModel> {
        match self.model_name.as_str() {
            "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            other => Err(EmbedError::invalid_config(format!(
                "unknown embedding model: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves_to_minilm() {
        let config = EmbedConfig::default();
        assert_eq!(config.model_name(), "all-MiniLM-L6-v2");
        assert!(config.normalize());
        assert!(config.embedding_model().is_ok());
    }

    #[test]
    fn unknown_model_is_rejected() {
        let config = EmbedConfig::new("definitely-not-a-model");
        assert!(matches!(
            config.embedding_model(),
            Err(EmbedError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn batch_size_is_never_zero() {
        let config = EmbedConfig::default().with_batch_size(0);
        assert_eq!(config.batch_size(), 1);
    }
}
