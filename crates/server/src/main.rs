use std::{net::SocketAddr, sync::Arc};

use server_api::ApiContext;
use storage::Storage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::{build_router, config::load_settings, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let storage = Storage::new(&settings.database_url).await.map_err(|error| {
        error!(
            database_url = %settings.database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if settings.seed_demo_contacts {
        let seeded = storage.seed_demo_contacts().await?;
        if seeded == 0 {
            info!("contact store already populated; skipping demo seed");
        }
    }

    let state = AppState {
        api: ApiContext::new(storage),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "contacts server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("contacts server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
