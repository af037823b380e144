use anyhow::Context;
use text_splitter::{Characters, ChunkConfig, TextSplitter};

/// Drops every character outside the 7-bit printable range, keeping ASCII
/// whitespace. Lossy on purpose: diacritics and non-Latin scripts do not
/// survive, matching the downstream assumption of plain-ASCII chunks.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_graphic() || c.is_ascii_whitespace())
        .collect()
}

/// Character-budget splitter with overlap between neighboring chunks.
pub struct CharacterChunker {
    splitter: TextSplitter<Characters>,
}

impl CharacterChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> anyhow::Result<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .context("chunk overlap must be smaller than chunk size")?;
        Ok(Self {
            splitter: TextSplitter::new(config),
        })
    }

    pub fn chunk<'text>(&self, text: &'text str) -> Vec<&'text str> {
        self.splitter.chunks(text).collect()
    }
}
