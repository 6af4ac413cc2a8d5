use std::sync::Arc;

use filmdex::{AppState, catalog::Catalog, config::Config, db, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,filmdex=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    let db = db::connect_and_migrate(&config.database_url).await?;
    let catalog = Catalog::new(db.clone());

    let state = Arc::new(AppState { config: config.clone(), db, catalog });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
