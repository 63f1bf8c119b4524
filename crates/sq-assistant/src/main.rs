//! StockQuery assistant binary. Answers free-text stock questions from the terminal.
//!
//! Logs go to stderr as JSON (filter with `RUST_LOG`); replies go to stdout.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use sq_assistant::bootstrap;
use sq_assistant::config::{AssistantConfig, ClassifierBackend};
use sq_assistant::repl;
use sq_text::Locale;

#[derive(Debug, Parser)]
#[command(name = "sq-assistant", version, about = "Answer stock questions against an item catalog")]
struct Args {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "SQ_CONFIG")]
    config: Option<PathBuf>,

    /// Resolve a single question, print the reply and exit.
    #[arg(short, long)]
    query: Option<String>,

    /// Intents JSON file (overrides the config).
    #[arg(long)]
    intents: Option<PathBuf>,

    /// SQLite catalog URL (overrides the config).
    #[arg(long)]
    database_url: Option<String>,

    /// Classifier backend (overrides the config).
    #[arg(long, value_enum)]
    backend: Option<ClassifierBackend>,

    /// Locale for normalization and replies (overrides the config).
    #[arg(long)]
    locale: Option<Locale>,

    /// Similarity threshold, 0-100 (overrides the config).
    #[arg(long)]
    threshold: Option<u8>,
}

impl Args {
    fn apply(&self, config: &mut AssistantConfig) {
        if let Some(path) = &self.intents {
            config.intents_path = path.clone();
        }
        if let Some(url) = &self.database_url {
            config.store.database_url = url.clone();
        }
        if let Some(backend) = self.backend {
            config.classifier.backend = backend;
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(threshold) = self.threshold {
            config.matcher.threshold = threshold;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sq-assistant starting");

    // ── Load config ─────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => AssistantConfig::from_file(path)?,
        None => {
            tracing::info!("no config file given, using defaults");
            AssistantConfig::default()
        }
    };
    args.apply(&mut config);
    config.validate()?;
    tracing::info!(
        locale = %config.locale,
        intents = %config.intents_path.display(),
        threshold = config.matcher.threshold,
        "config loaded"
    );

    // ── Build pipeline ──────────────────────────────────────────
    let resolver = bootstrap::build_resolver(&config)?;
    tracing::info!(intent_count = resolver.intents().len(), "sq-assistant ready");

    let mut stdout = tokio::io::stdout();

    // ── One-shot mode ───────────────────────────────────────────
    if let Some(query) = &args.query {
        let reply = resolver.respond(query).await;
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        return Ok(());
    }

    // ── Interactive loop ────────────────────────────────────────
    let sentinel = config.exit_sentinel();
    let stdin = BufReader::new(tokio::io::stdin());
    repl::run_session(&resolver, &sentinel, stdin, &mut stdout).await?;

    tracing::info!("sq-assistant stopped");
    Ok(())
}
