use anyhow::Result;
use std::env;
use tmlstats::server::{self, Config};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    let config = Config::from_env()?;
    info!("starting mod statistics service");
    info!("upstream: {}", config.upstream);
    info!("entry page: http://localhost:{}/", config.port);
    info!("author endpoint: POST http://localhost:{}/author_api", config.port);
    info!("list endpoint: POST http://localhost:{}/list_api", config.port);

    server::run(config).await
}
