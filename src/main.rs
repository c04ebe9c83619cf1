//! Main entry point for GPT Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpt_translator::cli::commands::{self, Commands};

/// GPT Translator - chunked document translation over chat completions
#[derive(Parser, Debug)]
#[command(name = "gpt-translator", version, about, long_about = None)]
struct Args {
    /// OpenAI API key (optional, defaults to OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Commands::Translate {
            file,
            output,
            target_lang,
            max_tokens,
            model,
            recursive,
        }) => {
            commands::handle_translate(
                args.api_key,
                file,
                output,
                target_lang,
                max_tokens,
                model,
                recursive,
            )
            .await?;
        }
        Some(Commands::Plan { file, max_tokens }) => {
            commands::handle_plan(file, max_tokens).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
