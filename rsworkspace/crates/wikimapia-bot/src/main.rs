//! Wikimapia Telegram bot
//!
//! Long-polls Telegram, answers location shares with nearby places and emoji
//! selections with place details and photos.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wikimapia_bot::analytics::NatsAnalytics;
use wikimapia_bot::config::Config;
use wikimapia_bot::handlers;
use wikimapia_bot::health::{self, AppState};
use wikimapia_bot::i18n::Catalog;
use wikimapia_bot::nats;
use wikimapia_bot::nats_impls::NatsKv;
use wikimapia_bot::photos::PhotoPipeline;
use wikimapia_bot::Engine;
use wikimapia_client::WikimapiaClient;

/// Wikimapia Telegram bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/wikimapia-bot.toml")]
    config: String,

    /// NATS URL (overrides config file)
    #[arg(long, env = "NATS_URL")]
    nats_url: Option<String>,

    /// Telegram bot token (overrides config file)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Wikimapia API key (overrides config file)
    #[arg(long, env = "WIKIMAPIA_KEY")]
    wikimapia_key: Option<String>,

    /// NATS prefix (overrides config file)
    #[arg(long, env = "WIKIMAPIA_PREFIX")]
    prefix: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3000")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wikimapia_bot=debug,wikimapia_client=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Wikimapia bot");

    let args = Args::parse();

    let config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        let mut config = Config::from_file(&args.config)?;

        if let Some(nats_url) = args.nats_url {
            config.nats.servers = nats_url.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(bot_token) = args.bot_token {
            config.telegram.bot_token = bot_token;
        }
        if let Some(key) = args.wikimapia_key {
            config.wikimapia.api_key = key;
        }
        if let Some(prefix) = args.prefix {
            config.nats.prefix = prefix;
        }

        config
    } else {
        info!("Config file not found, using environment variables");
        Config::from_env()?
    };

    info!("Configuration loaded successfully");
    info!("NATS servers: {:?}", config.nats.servers);
    info!("NATS prefix: {}", config.nats.prefix);
    if config.wikimapia.api_key.is_empty() {
        warn!("Wikimapia API key is empty; place lookups will fail");
    }

    info!("Connecting to NATS...");
    let nats_client = nats::connect(&config.nats).await?;

    let js = async_nats::jetstream::new(nats_client.clone());
    let locale_kv = nats::setup_locale_kv(&js, &config.nats.prefix).await?;
    info!("JetStream setup complete");

    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram.bot_token);

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            let username = me.username().to_string();
            info!("Bot authenticated as: @{}", username);
            Some(username)
        }
        Err(e) => {
            error!("Failed to authenticate bot: {}", e);
            return Err(e.into());
        }
    };

    let health_state = AppState::new(bot_username);
    *health_state.nats_connected.write().await = true;

    let health_state_clone = health_state.clone();
    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state_clone, health_port).await {
            error!("Health check server error: {}", e);
        }
    });

    let lookup = WikimapiaClient::new(config.wikimapia.clone())?;
    let photo_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.wikimapia.timeout_secs))
        .build()?;
    let photos = PhotoPipeline::new(photo_http, config.photos.download_dir(), config.photos.limit);
    info!("Downloading photos into {}", config.photos.download_dir().display());

    let analytics = config
        .analytics
        .enabled
        .then(|| NatsAnalytics::new(nats_client.clone(), config.nats.prefix.clone()));
    if analytics.is_none() {
        info!("Analytics disabled");
    }

    let catalog = Catalog::load(config.i18n.dir.as_deref())?;

    let engine: Arc<handlers::BotEngine> = Arc::new(Engine::new(
        lookup,
        photos,
        analytics,
        NatsKv::new(locale_kv),
        catalog,
        health_state.clone(),
    ));

    info!("Bot initialized, starting message dispatcher...");

    let handler = Update::filter_message()
        .branch(
            dptree::filter(|msg: Message| msg.location().is_some())
                .endpoint(handlers::handle_location_message),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some())
                .endpoint(handlers::handle_text_message),
        );

    // Updates of one chat are handled in order; chats run concurrently.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine, health_state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Wikimapia bot stopped");
    Ok(())
}
