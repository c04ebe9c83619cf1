//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;

use crate::core::chunker::Chunker;
use crate::core::config::{TranslatorConfig, DEFAULT_MAX_TOKENS};
use crate::core::tokenizer::BpeEncoder;
use crate::core::translator::DocumentTranslator;
use crate::processors::file::{default_output_path, output_path_for, FileProcessor};

/// Commands for GPT Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a text/Markdown file or a directory of them
    Translate {
        /// Input file or directory (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language, passed verbatim into the instruction
        #[arg(short, long)]
        target_lang: String,

        /// Token ceiling per request (default: 400)
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Chat model to use (default: gpt-3.5-turbo)
        #[arg(long)]
        model: Option<String>,

        /// Recursively translate subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Show how a file would be chunked, without calling the API
    Plan {
        /// Input file (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Token ceiling per request
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,
    },
}

/// Handle translation command
pub async fn handle_translate(
    api_key: Option<String>,
    file: PathBuf,
    output: Option<PathBuf>,
    target_lang: String,
    max_tokens: Option<usize>,
    model: Option<String>,
    recursive: bool,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;
    use tracing::{error, info};

    // Credential problems stop us before any file is touched
    let mut config = TranslatorConfig::from_env_with_key(api_key)?;
    if let Some(max_tokens) = max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(model) = model {
        config.model = model;
    }

    let start_time = Instant::now();
    let output = output.unwrap_or_else(|| default_output_path(&file));

    info!("Input: {}", file.display());
    info!("Output: {}", output.display());
    info!("Target language: {}", target_lang);
    info!("Model: {}, ceiling: {} tokens", config.model, config.max_tokens);

    let processor = FileProcessor::new(DocumentTranslator::from_config(config)?);

    let files = if file.is_dir() {
        let found = if recursive {
            processor.find_files_recursive(&file)?
        } else {
            processor.find_files(&file)?
        };
        // Skip earlier results when the output lives inside the input tree
        found
            .into_iter()
            .filter(|f| !f.starts_with(&output))
            .collect()
    } else {
        vec![file.clone()]
    };

    if files.is_empty() {
        anyhow::bail!("No translatable files found");
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("=>-"),
    );

    let mut processed = 0;
    let mut failed = 0;

    for file_path in &files {
        pb.set_message(format!("Processing: {}", file_path.display()));
        let target = output_path_for(file_path, &file, &output);

        match processor.translate_file(file_path, &target, &target_lang).await {
            Ok(()) => processed += 1,
            Err(e) => {
                failed += 1;
                error!("Error processing {}: {}", file_path.display(), e);
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Completed");

    let duration = start_time.elapsed();
    info!(
        "Completed: {} processed, {} failed in {:?}",
        processed, failed, duration
    );

    println!("\n✅ Translation finished");
    println!("   Processed: {}", processed);
    println!("   Failed: {}", failed);
    println!("   Time: {:?}", duration);

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed to translate", failed, files.len());
    }

    Ok(())
}

/// Handle plan command
pub async fn handle_plan(file: PathBuf, max_tokens: usize) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&file).await?;
    let encoder = BpeEncoder::new()?;
    let chunks = Chunker::new(&encoder, max_tokens).chunk(&content);

    println!(
        "{}: {} chunk(s), ceiling {} tokens, {} pause(s)",
        file.display(),
        chunks.len(),
        max_tokens,
        chunks.iter().filter(|c| c.needs_pacing()).count()
    );

    for chunk in &chunks {
        let marker = if chunk.tokens > max_tokens { " (oversized)" } else { "" };
        println!(
            "  #{:<3} {:>6} tokens {:>3} paragraph(s) [{}]{}  {}",
            chunk.index + 1,
            chunk.tokens,
            chunk.paragraphs,
            chunk.boundary,
            marker,
            preview(&chunk.text)
        );
    }

    Ok(())
}

/// First line of a chunk, shortened for display
fn preview(text: &str) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut shown: String = line.chars().take(48).collect();
    if line.chars().count() > 48 {
        shown.push('…');
    }
    shown
}
