//! Paragraph-aligned, token-bounded chunking

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::models::{Chunk, ChunkBoundary};
use crate::core::tokenizer::TokenEncoder;

/// One blank line, tolerant of carriage returns
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("paragraph break pattern is valid"));

/// A paragraph and the exact delimiter that followed it in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'a> {
    pub text: &'a str,
    /// Empty for the last paragraph
    pub delimiter: &'a str,
}

/// Split a document on blank lines.
///
/// Always yields at least one paragraph; an empty document yields one empty
/// paragraph. Concatenating every `text` + `delimiter` gives back `document`.
pub fn split_paragraphs(document: &str) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut start = 0;

    for found in PARAGRAPH_BREAK.find_iter(document) {
        paragraphs.push(Paragraph {
            text: &document[start..found.start()],
            delimiter: found.as_str(),
        });
        start = found.end();
    }

    paragraphs.push(Paragraph {
        text: &document[start..],
        delimiter: "",
    });

    paragraphs
}

/// Greedy paragraph accumulator bounded by a token ceiling
pub struct Chunker<'a> {
    encoder: &'a dyn TokenEncoder,
    max_tokens: usize,
}

impl<'a> Chunker<'a> {
    pub fn new(encoder: &'a dyn TokenEncoder, max_tokens: usize) -> Self {
        Self {
            encoder,
            max_tokens,
        }
    }

    /// Partition `document` into chunks.
    ///
    /// A chunk is closed when adding the next paragraph would push the
    /// accumulator over the ceiling. Paragraphs are never split, so a single
    /// oversized paragraph travels as its own chunk. The last chunk is always
    /// closed by [`ChunkBoundary::EndOfDocument`], even when empty.
    pub fn chunk(&self, document: &str) -> Vec<Chunk> {
        let paragraphs = split_paragraphs(document);
        let total = paragraphs.len();

        let mut chunks = Vec::new();
        let mut accumulator = String::new();
        let mut accumulated = 0;

        for (i, paragraph) in paragraphs.iter().enumerate() {
            debug!("Paragraph {} of {}", i + 1, total);

            if !accumulator.is_empty() {
                let candidate = format!("{}{}", accumulator, paragraph.text);
                if self.encoder.token_len(&candidate) > self.max_tokens {
                    chunks.push(self.close(
                        chunks.len(),
                        std::mem::take(&mut accumulator),
                        accumulated,
                        ChunkBoundary::Ceiling,
                    ));
                    accumulated = 0;
                }
            }

            accumulator.push_str(paragraph.text);
            accumulator.push_str(paragraph.delimiter);
            accumulated += 1;
        }

        chunks.push(self.close(
            chunks.len(),
            accumulator,
            accumulated,
            ChunkBoundary::EndOfDocument,
        ));

        chunks
    }

    fn close(&self, index: usize, text: String, paragraphs: usize, boundary: ChunkBoundary) -> Chunk {
        let tokens = self.encoder.token_len(&text);
        if tokens > self.max_tokens {
            debug!(
                "Chunk {} holds {} tokens, above the ceiling of {}",
                index + 1,
                tokens,
                self.max_tokens
            );
        }
        Chunk {
            index,
            text,
            tokens,
            paragraphs,
            boundary,
        }
    }
}
