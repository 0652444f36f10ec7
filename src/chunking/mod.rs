//! Fixed-size text chunking with overlap.
//!
//! Splits a document into overlapping character windows for embedding.
//! Chunking is a pure function: the same input and parameters always
//! produce the same chunks.

use crate::error::{Result, SporreError};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Split text into overlapping fixed-size chunks.
///
/// Windows advance by `chunk_size - chunk_overlap` characters, so for text
/// longer than one chunk the count is `ceil((len - overlap) / (size - overlap))`.
/// Every chunk is at most `chunk_size` characters; the final chunk may be
/// shorter.
///
/// Fails with `EmptyContent` if `text` is empty after trimming, and with
/// `InvalidInput` if `chunk_size` is zero or `chunk_overlap >= chunk_size`.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(SporreError::InvalidInput(
            "chunk_size must be greater than zero".to_string(),
        ));
    }
    if chunk_overlap >= chunk_size {
        return Err(SporreError::InvalidInput(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            chunk_overlap, chunk_size
        )));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SporreError::EmptyContent);
    }

    // Operate on characters, not bytes, so multi-byte text never splits
    // inside a code point.
    let chars: Vec<char> = trimmed.chars().collect();
    let step = chunk_size - chunk_overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("hello world", 100, 20).unwrap();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_chunk_count_matches_formula() {
        // 2000 chars, size 500, overlap 100 -> step 400 -> ceil(1900/400) = 5
        let text = "A".repeat(2000);
        let chunks = chunk_text(&text, 500, 100).unwrap();
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.chars().count() <= 500));
        assert_eq!(chunks.last().unwrap().chars().count(), 400);
    }

    #[test]
    fn test_exact_fit_is_one_chunk() {
        let text = "B".repeat(500);
        let chunks = chunk_text(&text, 500, 100).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_one_char_past_fit_is_two_chunks() {
        let text = "C".repeat(501);
        let chunks = chunk_text(&text, 500, 100).unwrap();
        assert_eq!(chunks.len(), 2);
        // Second window starts at the step boundary and carries the overlap.
        assert_eq!(chunks[1].chars().count(), 101);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text: String = ('a'..='z').cycle().take(1000).collect();
        let chunks = chunk_text(&text, 300, 50).unwrap();
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(250).collect();
            let head: String = pair[1].chars().take(50).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let a = chunk_text(&text, 128, 32).unwrap();
        let b = chunk_text(&text, 128, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let chunks = chunk_text("  padded  ", 100, 0).unwrap();
        assert_eq!(chunks, vec!["padded".to_string()]);
    }

    #[test]
    fn test_empty_content_rejected() {
        assert!(matches!(
            chunk_text("   \n\t ", 100, 20),
            Err(SporreError::EmptyContent)
        ));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            chunk_text("text", 0, 0),
            Err(SporreError::InvalidInput(_))
        ));
        assert!(matches!(
            chunk_text("text", 100, 100),
            Err(SporreError::InvalidInput(_))
        ));
        assert!(matches!(
            chunk_text("text", 100, 150),
            Err(SporreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unicode_text_splits_on_char_boundaries() {
        let text = "日本語のテキスト。".repeat(100);
        let chunks = chunk_text(&text, 200, 40).unwrap();
        assert!(chunks.len() > 1);
        let rejoined: usize = chunks.iter().map(|c| c.chars().count()).sum();
        // Overlap means the sum of chunk lengths exceeds the source length.
        assert!(rejoined >= text.chars().count());
    }
}
