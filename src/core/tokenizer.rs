//! Token length estimation

use std::fmt;

use tiktoken_rs::CoreBPE;

use crate::core::errors::{Result, TranslationError};

/// Measures the encoded-token length of a piece of text.
///
/// The chunker asks this for every accumulator candidate, so one encoder
/// instance governs all ceiling decisions.
pub trait TokenEncoder: Send + Sync {
    /// Number of tokens `text` encodes to
    fn token_len(&self, text: &str) -> usize;
}

/// GPT-3 byte-pair encoder (`r50k_base`)
pub struct BpeEncoder {
    bpe: CoreBPE,
}

impl BpeEncoder {
    /// Load the `r50k_base` vocabulary
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::r50k_base().map_err(|e| {
            TranslationError::config(format!("failed to load r50k_base vocabulary: {}", e))
        })?;
        Ok(Self { bpe })
    }
}

impl fmt::Debug for BpeEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BpeEncoder(r50k_base)")
    }
}

impl TokenEncoder for BpeEncoder {
    fn token_len(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// One token per character. Deterministic stand-in for tests and dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCountEncoder;

impl TokenEncoder for CharCountEncoder {
    fn token_len(&self, text: &str) -> usize {
        text.chars().count()
    }
}

impl<T: TokenEncoder + ?Sized> TokenEncoder for Box<T> {
    fn token_len(&self, text: &str) -> usize {
        (**self).token_len(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_encoder() {
        let encoder = CharCountEncoder;
        assert_eq!(encoder.token_len(""), 0);
        assert_eq!(encoder.token_len("Para1\n\n"), 7);
        assert_eq!(encoder.token_len("héllo"), 5);
    }

    #[test]
    fn test_bpe_encoder() {
        let encoder = BpeEncoder::new().unwrap();
        assert_eq!(encoder.token_len(""), 0);
        assert_eq!(encoder.token_len("hello world"), 2);
        assert!(encoder.token_len("hello world, this is a longer sentence") > 2);
    }

    #[test]
    fn test_boxed_encoder() {
        let encoder: Box<dyn TokenEncoder> = Box::new(CharCountEncoder);
        assert_eq!(encoder.token_len("abc"), 3);
    }
}
