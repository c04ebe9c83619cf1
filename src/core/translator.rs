//! Document translation: chunk, dispatch sequentially, reassemble

use tracing::{debug, info};

use crate::core::chunker::Chunker;
use crate::core::client::OpenAiClient;
use crate::core::config::{TranslatorConfig, DEFAULT_MAX_TOKENS, DEFAULT_SEPARATOR};
use crate::core::dispatcher::{ChatEndpoint, Dispatcher, FixedDelayPacer, Pacer};
use crate::core::errors::Result;
use crate::core::models::Chunk;
use crate::core::prompt::build_system_prompt;
use crate::core::tokenizer::{BpeEncoder, TokenEncoder};

/// Per-call chunking options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Token ceiling that triggers a flush
    pub max_tokens: usize,
    /// Appended after every translated chunk except the last
    pub separator: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl TranslateOptions {
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Translates whole documents one chunk at a time
pub struct DocumentTranslator<E, P = FixedDelayPacer> {
    dispatcher: Dispatcher<E>,
    pacer: P,
    encoder: Box<dyn TokenEncoder>,
    options: TranslateOptions,
}

impl DocumentTranslator<OpenAiClient, FixedDelayPacer> {
    /// Wire the HTTP client, GPT-3 encoder and fixed pacer from a config
    pub fn from_config(config: TranslatorConfig) -> Result<Self> {
        let options = TranslateOptions {
            max_tokens: config.max_tokens,
            separator: config.separator.clone(),
        };
        let pacer = FixedDelayPacer::from_millis(config.pacing_delay_ms);
        let model = config.model.clone();
        let top_p = config.top_p;
        let client = OpenAiClient::new(config)?;

        Ok(Self::new(Dispatcher::new(client, model, top_p), pacer, BpeEncoder::new()?)
            .with_options(options))
    }
}

impl<E: ChatEndpoint, P: Pacer> DocumentTranslator<E, P> {
    pub fn new(dispatcher: Dispatcher<E>, pacer: P, encoder: impl TokenEncoder + 'static) -> Self {
        Self {
            dispatcher,
            pacer,
            encoder: Box::new(encoder),
            options: TranslateOptions::default(),
        }
    }

    /// Replace the default chunking options
    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Chunks `text` would be sent as, without sending anything
    pub fn plan(&self, text: &str, max_tokens: usize) -> Vec<Chunk> {
        Chunker::new(self.encoder.as_ref(), max_tokens).chunk(text)
    }

    /// Translate `text` with the configured options
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        self.translate_with(text, target_language, &self.options).await
    }

    /// Translate `text` into `target_language`.
    ///
    /// Chunks go out strictly one after another, in document order. After
    /// every chunk closed by the token ceiling the pacer runs once, so `N`
    /// chunks cause `N - 1` pauses. The first failed request aborts the
    /// whole translation and nothing partial is returned.
    pub async fn translate_with(
        &self,
        text: &str,
        target_language: &str,
        options: &TranslateOptions,
    ) -> Result<String> {
        let instruction = build_system_prompt(target_language);
        let chunks = self.plan(text, options.max_tokens);
        let total = chunks.len();

        info!("Start translating...");
        debug!(
            "{} chunk(s), ceiling {} tokens, target {}",
            total, options.max_tokens, target_language
        );

        let mut translated = String::new();

        for chunk in &chunks {
            debug!(
                "Dispatching chunk {} ({} tokens, {} paragraph(s))",
                chunk.index + 1,
                chunk.tokens,
                chunk.paragraphs
            );

            let content = self
                .dispatcher
                .translate_chunk(&chunk.text, &instruction)
                .await?;
            translated.push_str(&content);

            info!("Translated {} of {}", chunk.index + 1, total);

            if chunk.needs_pacing() {
                translated.push_str(&options.separator);
                self.pacer.pause().await;
            }
        }

        info!("Translation completed!");
        Ok(translated)
    }
}
