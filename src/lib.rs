//! GPT Translator - chunked document translation library
//!
//! Long documents are split on blank lines into chunks that stay under a
//! token ceiling, sent one at a time to a chat completion endpoint, and the
//! translations are joined back together in order.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod processors;

// Re-export key types for convenience
pub use crate::core::{
    chunker::{split_paragraphs, Chunker, Paragraph},
    client::OpenAiClient,
    config::TranslatorConfig,
    dispatcher::{ChatEndpoint, Dispatcher, FixedDelayPacer, Pacer},
    errors::{Result, TranslationError},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Chunk, ChunkBoundary, Role},
    tokenizer::{BpeEncoder, CharCountEncoder, TokenEncoder},
    translator::{DocumentTranslator, TranslateOptions},
};

pub use processors::file::FileProcessor;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
