use dotenvy::dotenv;
use std::env;
use stock_buddy::{
    bot::{self, BotData},
    config::{database, settings},
    core::maintenance,
    errors::{Error, Result},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Settings file used when `SHOP_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the shop settings
    let config_path = env::var("SHOP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let shop_config = settings::load_config_or_default(&config_path)
        .inspect_err(|e| error!("Failed to load shop settings from {}: {}", config_path, e))?;
    info!(
        "Shop settings loaded: currency {}, purchase costs stored as {}",
        shop_config.currency, shop_config.cost_convention
    );

    // 4. Initialize database
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Optional retention pruning
    if shop_config.prune_on_startup {
        maintenance::prune_old_transactions(&db, shop_config.retention_years)
            .await
            .inspect_err(|e| error!("Startup pruning failed: {}", e))?;
    }

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in ShopConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, shop_config)).await?;

    Ok(())
}
