mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;

use corkboard_api::token::AuthConfig;
use corkboard_api::{AppStateInner, router};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corkboard=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = corkboard_db::Database::open(&PathBuf::from(&config.db_path))?;

    let state = AppStateInner::new(
        db,
        AuthConfig {
            jwt_secret: config.jwt_secret,
            algorithm: config.jwt_algorithm,
            token_ttl_days: config.token_ttl_days,
        },
    );

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Corkboard server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
