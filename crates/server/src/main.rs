mod config;
mod http;
mod ops;
mod render;
mod state;

use std::time::Duration;

use anyhow::Context;
use auth::PrincipalResolver;
use dotenvy::dotenv;
use tracing::info;

use config::{AuthSettings, Settings};
use http::router::build_router;
use state::AppState;
use storage::Db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new().context("Failed to load configuration")?;

    let db = Db::new(&settings.database.url).await?;

    let resolver = match &settings.auth {
        AuthSettings::Session { idle_timeout_secs } => {
            info!("auth mode: session, idle timeout {}s", idle_timeout_secs);
            PrincipalResolver::session(Duration::from_secs(*idle_timeout_secs))
        }
        AuthSettings::Bearer {
            token_secret,
            token_ttl_secs,
        } => {
            info!("auth mode: bearer, token ttl {}s", token_ttl_secs);
            PrincipalResolver::bearer(token_secret, *token_ttl_secs)
        }
    };

    // 会话模式下定期清扫过期会话；令牌模式无服务端状态可扫
    if let PrincipalResolver::Session(store) = &resolver {
        let store = store.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(300));
            loop {
                ticker.tick().await;
                store.sweep();
            }
        });
    }

    let state = AppState { db, resolver };

    let app = build_router(state, &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
