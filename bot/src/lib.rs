//! PriceScout Telegram bot.
//!
//! This is the thin application shell: it loads configuration, wires the
//! search coordinator to a Chromium session provider and serves chat updates.
//! Search logic lives in the `crates/` directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod handler;
pub mod messenger;
pub mod polling;
pub mod presenter;
pub mod telegram;

pub use error::{BotError, Result};
pub use handler::BotHandler;
pub use messenger::{ChatId, Messenger};
pub use presenter::ProductCard;
pub use telegram::TelegramClient;

use anyhow::Context;
use pricescout_browser::ChromiumLauncher;
use pricescout_core::{AppConfig, SearchConfig};
use pricescout_scanner::SearchCoordinator;
use pricescout_sources::{SourceLoader, SourceRegistry};
use std::sync::Arc;
use tracing::info;

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pricescout=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Load configuration and serve the bot until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    info!("Starting PriceScout v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env().context("failed to load configuration")?;
    config.validate()?;
    let token = config.bot_token()?;

    let sources = build_sources(&config.search).context("failed to load source definitions")?;
    anyhow::ensure!(!sources.is_empty(), "every source is disabled");
    info!(
        sources = ?sources.iter().map(|s| s.marketplace).collect::<Vec<_>>(),
        "sources ready"
    );

    let coordinator = SearchCoordinator::new(ChromiumLauncher::new(config.browser.clone()), sources)
        .with_min_query_chars(config.search.min_query_chars)
        .with_deadline(config.search.deadline())
        .with_max_concurrent_searches(config.search.max_concurrent_searches);
    let client = TelegramClient::new(token, &config.telegram)?;
    let handler = BotHandler::new(
        coordinator,
        client,
        config.telegram.placeholder_image.clone(),
    )
    .with_min_query_chars(config.search.min_query_chars);

    info!("bot started, polling for updates");
    polling::run_polling(Arc::new(handler)).await;
    Ok(())
}

/// Built-in sources, overridden from `sources_dir` when set, minus the disabled ones.
pub fn build_sources(search: &SearchConfig) -> pricescout_sources::Result<SourceRegistry> {
    let mut sources = match &search.sources_dir {
        Some(dir) => SourceRegistry::builtin_with_overrides(&SourceLoader::new(dir)?)?,
        None => SourceRegistry::builtin(),
    };
    sources.disable(&search.disabled);
    Ok(sources)
}
