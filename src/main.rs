use kiosk_form::config::{AppConfig, StorageBackend};
use kiosk_form::seed;
use kiosk_form::store::{MemoryStore, PostgresStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info) // Default to Info for everything
        .filter_module("sqlx", LevelFilter::Warn) // Suppress sqlx Debug logs
        .init();

    println!("Kiosk questionnaire server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}, storage={:?}",
        config.server.host, config.server.port, config.storage
    );

    match config.storage {
        StorageBackend::Postgres => {
            println!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store =
                PostgresStore::new(&database_url, config.max_connections()).await?;

            println!("Running database migrations...");
            postgres_store.migrate().await?;

            let store = Arc::new(postgres_store);
            if config.load_seed_data {
                println!("Loading seed data...");
                seed::load_seed_data(&*store).await?;
                println!("Seed data loaded successfully");
            }
            kiosk_form::serve(store, &config).await?;
        }
        StorageBackend::Memory => {
            println!("Using in-memory storage, answers are lost on restart");
            let store = Arc::new(MemoryStore::new());
            if config.load_seed_data {
                println!("Loading seed data...");
                seed::load_seed_data(&*store).await?;
                println!("Seed data loaded successfully");
            }
            kiosk_form::serve(store, &config).await?;
        }
    }

    Ok(())
}
