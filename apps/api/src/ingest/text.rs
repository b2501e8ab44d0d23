//! Description cleanup and word-window chunking.

use crate::ingest::IngestError;

/// Default chunk length in words (roughly 200–500 tokens).
pub const DEFAULT_CHUNK_WORDS: usize = 300;
/// Default number of words shared by consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Collapses every whitespace run to a single space and trims the ends.
pub fn clean_description(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `text` into windows of `chunk_size` words, each starting
/// `chunk_size - overlap` words after the previous one.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, IngestError> {
    if chunk_size == 0 {
        return Err(IngestError::InvalidArgument(
            "chunk_size must be at least 1".to_string(),
        ));
    }
    if overlap >= chunk_size {
        return Err(IngestError::InvalidArgument(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let step = chunk_size - overlap;

    Ok((0..words.len())
        .step_by(step)
        .map(|start| {
            let end = (start + chunk_size).min(words.len());
            words[start..end].join(" ")
        })
        .filter(|chunk| !chunk.is_empty())
        .collect())
}
