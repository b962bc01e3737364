//! Overlapping sliding-window text chunking.
//!
//! Splits a document into fixed-size character windows so that every part of
//! the text is covered and adjacent windows share an overlap region. This is
//! the unit of storage and retrieval for the whole index: one chunk, one
//! embedding, one record.
//!
//! Windows are measured in *characters*, not bytes, so multi-byte UTF-8
//! content never gets sliced mid-codepoint.

use anyhow::{Result, bail};

/// Configuration for the sliding-window chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive windows. Must be strictly less
    /// than `chunk_size`.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// How far the window start advances each step.
    fn advance(&self) -> usize {
        self.chunk_size - self.overlap
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("chunk_size must be greater than zero");
        }
        if self.overlap >= self.chunk_size {
            bail!(
                "overlap ({}) must be less than chunk_size ({})",
                self.overlap,
                self.chunk_size
            );
        }
        Ok(())
    }
}

/// Split `text` into overlapping windows per `config`.
///
/// Each window starts `chunk_size - overlap` characters after the previous
/// one; the last window may be shorter. Windows that are entirely whitespace
/// are dropped. Text shorter than one window yields a single chunk (or none,
/// if blank). The configuration is checked up front: an overlap at or above
/// the window size would stall the loop, so it is rejected as an error.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    config.validate()?;

    // Byte offset of every character boundary, plus the end of the text, so
    // windows counted in chars map onto valid slice ranges.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < char_len {
        let end = (start + config.chunk_size).min(char_len);
        let window = &text[boundaries[start]..boundaries[end]];
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(window.to_string());
        }
        start += config.advance();
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("hello worl", &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks, vec!["hello worl".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunks = chunk_text("", &ChunkingConfig::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn whitespace_only_text_yields_no_chunks() {
        let chunks = chunk_text("   \n\t  ", &ChunkingConfig::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn windows_overlap_at_configured_stride() {
        // 1000 chars at size 500 / overlap 50: starts at 0, 450, 900.
        let text: String = std::iter::repeat('x').take(1000).collect();
        let chunks = chunk_text(&text, &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks[2].chars().count(), 100);
    }

    #[test]
    fn overlap_region_is_shared() {
        let text: String = ('a'..='z').cycle().take(600).collect();
        let config = ChunkingConfig::default();
        let chunks = chunk_text(&text, &config).unwrap();
        assert_eq!(chunks.len(), 2);

        let tail: String = chunks[0].chars().skip(450).collect();
        let head: String = chunks[1].chars().take(50).collect();
        assert_eq!(tail, head);
    }

    #[test]
    fn multibyte_text_slices_on_char_boundaries() {
        // Each snowman is 3 bytes; windows must not split a codepoint.
        let text: String = std::iter::repeat('☃').take(700).collect();
        let chunks = chunk_text(&text, &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 250);
    }

    #[test]
    fn overlap_equal_to_size_is_rejected() {
        let config = ChunkingConfig::new(100, 100);
        assert!(chunk_text("some text", &config).is_err());
    }

    #[test]
    fn overlap_above_size_is_rejected() {
        let config = ChunkingConfig::new(100, 150);
        assert!(chunk_text("some text", &config).is_err());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = ChunkingConfig::new(0, 0);
        assert!(chunk_text("some text", &config).is_err());
    }

    #[test]
    fn chunking_is_deterministic() {
        let text: String = ('a'..='z').cycle().take(1200).collect();
        let config = ChunkingConfig::default();
        let first = chunk_text(&text, &config).unwrap();
        let second = chunk_text(&text, &config).unwrap();
        assert_eq!(first, second);
    }
}
