use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use linkpage::{
    AppState, config::Config, database::PgStore, router::build_router, utils::build_info,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Starting linkpage ({})", build_info().replace('\n', ", "));

    let store = PgStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");
    store.migrate().await.expect("Failed to run migrations");

    if let Some(password) = &config.admin_password {
        match store.seed_credential(password).await {
            Ok(true) => tracing::info!("Seeded admin credential from ADMIN_PASSWORD"),
            Ok(false) => tracing::debug!("Admin credential already present"),
            Err(e) => tracing::warn!(error = %e, "Failed to seed admin credential"),
        }
    }

    let store = Arc::new(store);
    let state = AppState::new(store.clone(), config.clone());
    let app = build_router(state);

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    store.close().await;
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down server");
}
