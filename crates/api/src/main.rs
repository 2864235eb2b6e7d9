use anyhow::Context;

use globaltrade_api::app::{self, services::AppServices};
use globaltrade_store::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    globaltrade_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let services = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url)
                .await
                .context("failed to connect to database")?;
            AppServices::postgres(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (dev only)");
            AppServices::in_memory()
        }
    };

    let app = app::build_app(jwt_secret, services);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
