use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relay_api::{analyze_router, prices_router};
use relay_common::observability::{LogConfig, init_logging};
use relay_config::{RelayConfig, RelayConfigLoader};
use relay_llm::client_from_config;
use relay_social::telegram::TelegramApi;
use relay_verdict::VerdictService;
use relay_web::PriceScraper;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod bot;
mod serve;
mod shutdown;

const DEFAULT_CONFIG_FILE: &str = "relay.yaml";
const ANALYZE_PORT: u16 = 8000;
const PRICES_PORT: u16 = 5000;

#[derive(Parser, Debug)]
#[command(name = "relay", version, about = "Verdict analyze API, price API and chat relay bot")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "YAML config file (default: ./relay.yaml if present)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve POST /analyze (default port 8000).
    Analyze,
    /// Serve the price API (default port 5000).
    Prices,
    /// Relay Telegram messages to the LLM.
    Bot,
}

impl Commands {
    fn app_name(&self) -> &'static str {
        match self {
            Self::Analyze => "relay-analyze",
            Self::Prices => "relay-prices",
            Self::Bot => "relay-bot",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => RelayConfigLoader::new().with_file(path),
        None => RelayConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg = loader.load().context("failed to load configuration")?;

    let log_path = init_logging(LogConfig::for_service(
        cli.command.app_name(),
        &cfg.log_level,
    ))?;
    tracing::info!(log_file = %log_path.display(), command = ?cli.command, "starting");

    let cancel = CancellationToken::new();
    shutdown::cancel_on_signal(cancel.clone());

    match cli.command {
        Commands::Analyze => run_analyze(&cfg, cancel).await,
        Commands::Prices => run_prices(&cfg, cancel).await,
        Commands::Bot => run_bot(&cfg, cancel).await,
    }
}

async fn run_analyze(cfg: &RelayConfig, cancel: CancellationToken) -> Result<()> {
    let service = VerdictService::from_config(&cfg.analyze_llm())
        .context("failed to build the analyze LLM client")?;
    if service.is_llm_configured() {
        tracing::info!(model = service.model_name().unwrap_or("-"), "analyze.llm.ready");
    } else {
        tracing::warn!("OPENAI_API_KEY is not set; uncached requests will get 503");
    }

    let router = analyze_router(Arc::new(service));
    serve::serve(router, &cfg.bind_addr(ANALYZE_PORT), cancel).await
}

async fn run_prices(cfg: &RelayConfig, cancel: CancellationToken) -> Result<()> {
    let scraper = PriceScraper::new(&cfg.price_source_url)
        .with_context(|| format!("invalid price source {}", cfg.price_source_url))?;
    tracing::info!(source = scraper.source(), "prices.source");

    let router = prices_router(Arc::new(scraper));
    serve::serve(router, &cfg.bind_addr(PRICES_PORT), cancel).await
}

async fn run_bot(cfg: &RelayConfig, cancel: CancellationToken) -> Result<()> {
    let token = cfg.telegram_token().context("TG_KEY is not set")?;
    let llm = client_from_config(&cfg.bot_llm()).context("OPEN_ROUTER_KEY is not set")?;

    let telegram = TelegramApi::new(token.to_string())?;
    let me = telegram
        .get_me()
        .await
        .context("telegram rejected the bot token")?;
    tracing::info!(bot = me.username.as_deref().unwrap_or("-"), "bot.authenticated");

    bot::RelayBot::new(telegram, llm, cfg.bot_system_prompt.clone())
        .run(cancel)
        .await;
    Ok(())
}
