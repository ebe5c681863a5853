use std::{path::PathBuf, sync::Arc};

use {
    clap::Parser,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    relaygram_relay::{
        Dispatcher, RelayConfig, RelayMapStore, Router, SessionStore, TopicThreads,
    },
    relaygram_storage::{SqliteRelayMap, SqliteSessionStore, open_pool},
    relaygram_telegram::TelegramDispatcher,
};

#[derive(Parser)]
#[command(name = "relaygram", about = "relaygram: support-routing relay bot for Telegram")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Explicit config file (overrides discovery).
    #[arg(long, env = "RELAYGRAM_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config value).
    #[arg(long, env = "RELAYGRAM_DATABASE")]
    database: Option<PathBuf>,
}

/// Initialise tracing with an env-filter and either a human or JSON layer.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = match &cli.config {
        Some(path) => relaygram_config::load_config(path)?,
        None => relaygram_config::discover_and_load(),
    };
    config.validate()?;

    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.storage.database_path.clone());
    let pool = open_pool(&db_path).await?;
    SqliteSessionStore::init(&pool).await?;
    SqliteRelayMap::init(&pool).await?;
    info!(path = %db_path.display(), "database ready");

    let bot = relaygram_telegram::connect(&config.telegram.token).await?;

    let relay_config = RelayConfig {
        admin: config.relay.admin(),
        group: config.relay.group(),
        threads: TopicThreads {
            admin_support: config.relay.threads.admin_support(),
            sponsorship: config.relay.threads.sponsorship(),
            report_scam: config.relay.threads.report_scam(),
        },
    };
    let router = Arc::new(Router::new(
        Arc::new(SqliteSessionStore::new(pool.clone())) as Arc<dyn SessionStore>,
        Arc::new(SqliteRelayMap::new(pool.clone())) as Arc<dyn RelayMapStore>,
        Arc::new(TelegramDispatcher::new(bot.clone())) as Arc<dyn Dispatcher>,
        relay_config,
    ));

    let cancel = relaygram_telegram::start_polling(bot, router).await?;
    info!(admin = config.relay.admin_id, group = config.relay.group_chat_id, "relay running");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();

    Ok(())
}
