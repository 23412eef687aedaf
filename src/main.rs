//! Shoply Support - console support assistant
//!
//! Answers shop customers from the terminal: `/order <id>` looks up an order,
//! exact FAQ questions get the stored answer, and everything else goes to an
//! OpenAI-compatible model with the FAQ as context. Every turn is appended to
//! a JSONL session log.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod console;
mod conversation;
mod core;
mod knowledge;
mod providers;

use crate::config::{prompts, Config};
use crate::core::{SessionLogger, TurnRouter};
use crate::knowledge::KnowledgeStore;
use crate::providers::{ChatProvider, OpenAICompatConfig, OpenAICompatProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Diagnostics go to stderr so they never interleave with the chat on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shoply_support=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let knowledge = KnowledgeStore::load(&config.data_dir)
        .context("failed to load the knowledge store")?;

    let log = SessionLogger::open(&config.log_dir, chrono::Local::now())
        .with_context(|| format!("failed to open session log in {}", config.log_dir.display()))?;

    let provider = OpenAICompatProvider::new(OpenAICompatConfig::from(&config))
        .context("failed to build the HTTP client")?;
    tracing::info!(model = provider.model(), endpoint = %config.api_base, "model provider ready");

    let mut router = TurnRouter::new(
        knowledge,
        Box::new(provider),
        log,
        &prompts::system_prompt(&config.brand_name),
        config.memory_cap,
    );

    println!("{}", prompts::banner(&config.brand_name, router.model()));

    let input = console::spawn_stdin_reader().context("failed to start the stdin reader")?;
    let mut stdout = tokio::io::stdout();
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let result = console::run(&mut router, input, &mut stdout, interrupt).await;
    router.close();

    let end = result.context("console session failed")?;
    tracing::info!(?end, "session finished");
    Ok(())
}
