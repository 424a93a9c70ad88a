//! `mcpchat`: send one prompt through the tool-augmented chat loop
//!
//! Tool servers and defaults come from `.config/mcpchat/config.yaml` in the
//! current directory, falling back to `~/.config/mcpchat/config.yaml`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use mcpchat_core::chat::{ChatOptions, ChatRunner};
use mcpchat_core::config::{ConfigLevel, ConfigProvider, FileConfigProvider};
use mcpchat_core::logging::{ConsoleLogger, Logger, NoOpLogger};
use mcpchat_core::providers::{create_provider, GenaiProvider, Provider};
use mcpchat_core::secrets::{EnvSecretStore, SecretStore};
use mcpchat_core::types::ChatMessage;

const DEFAULT_PROVIDER: &str = "openai";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Parser)]
#[command(name = "mcpchat", about = "Chat with a model that can call MCP tools")]
struct Args {
    /// Prompt to send
    prompt: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Completion provider (openai, anthropic, ollama, mock, ...)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model name, optionally prefixed with the provider ("openai/gpt-4o")
    #[arg(short, long)]
    model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    system: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint
    #[arg(long)]
    api_base: Option<String>,

    /// Maximum completion requests (0 for no limit)
    #[arg(long)]
    max_turns: Option<u32>,

    /// Ignore configured tool servers
    #[arg(long)]
    no_tools: bool,

    /// Log to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Provider named by a "provider/model" string, if any
fn provider_from_model(model: &str) -> Option<&str> {
    model.split_once('/').map(|(provider, _)| provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logger: Arc<dyn Logger> = if args.verbose {
        Arc::new(ConsoleLogger::new())
    } else {
        Arc::new(NoOpLogger)
    };

    let config = match &args.config {
        Some(path) => FileConfigProvider::new(path, ConfigLevel::User),
        None => FileConfigProvider::discover(std::env::current_dir()?),
    }
    .with_logger(Arc::clone(&logger));

    let defaults = config
        .get_defaults()
        .await
        .with_context(|| format!("reading {}", config.path().display()))?;

    let model = args
        .model
        .or(defaults.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let provider_id = args
        .provider
        .or(defaults.provider)
        .or_else(|| provider_from_model(&model).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    let secrets: Arc<dyn SecretStore> = Arc::new(EnvSecretStore::new());
    let provider: Arc<dyn Provider> = match args.api_base.or(defaults.api_base) {
        Some(base) => Arc::new(
            GenaiProvider::new(&provider_id, secrets, Arc::clone(&logger)).with_api_base(base),
        ),
        None => Arc::from(create_provider(&provider_id, secrets, Arc::clone(&logger))),
    };

    let mut options = ChatOptions::default();
    match args.max_turns.or(defaults.max_turns) {
        Some(0) => options = options.without_turn_limit(),
        Some(turns) => options = options.with_max_turns(turns),
        None => {}
    }

    let servers = if args.no_tools {
        Vec::new()
    } else {
        config.get_servers().await?
    };

    let mut conversation = Vec::new();
    if let Some(system) = args.system {
        conversation.push(ChatMessage::system(system));
    }
    conversation.push(ChatMessage::user(args.prompt));

    let runner = ChatRunner::new(provider, Arc::clone(&logger)).with_options(options);
    let reply = runner
        .run(&mut conversation, &model, &servers)
        .await
        .context("chat failed")?;

    println!("{}", reply.content.to_text());
    Ok(())
}
