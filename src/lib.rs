pub mod api;
pub mod client;
pub mod config;
pub mod form;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export the client-side form pipeline
pub use client::{AnswerSink, KioskClient, QuestionSource};
pub use form::{assemble_submission, AnswerStore, FormSession, InputStrategy};

// Export logic types
pub use logic::{build_forest, flat_listing, resolve_questions};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::load_seed_data;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use std::sync::Arc;

use crate::config::AppConfig;

/// Serve the questionnaire API for `store` until the listener fails
pub async fn serve<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    let app = api::routes::create_router()
        .with_state(store)
        .layer(api::routes::cors_layer(&config.cors));

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Kiosk questionnaire server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
