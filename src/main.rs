//! 产品目录 API 服务入口

use anyhow::Context;
use product_catalog::{
    app::{self, product::PgProductService, AppState},
    config::load_config,
    infrastructure::{database::DatabaseManager, logger::Logger},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_config().context("failed to load configuration")?;
    Logger::init(&config.logging)?;

    info!("Starting product catalog server...");
    match source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    let db = DatabaseManager::new(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;
    if config.database.ensure_schema {
        db.ensure_schema()
            .await
            .context("failed to create products table")?;
    }

    let state = AppState::new(Arc::new(PgProductService::new(db.get_pool().clone())));
    let app = app::router(state, &config.http);

    let listener = TcpListener::bind(config.http.bind_target()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Product catalog server running on http://{}", addr);
    info!("   POST   /product              - Create product");
    info!("   GET    /product/:id          - Get product by ID");
    info!("   PUT    /product/:id          - Update product");
    info!("   DELETE /product/:id          - Delete product");
    info!("   GET    /product/search?name= - Search products by name");
    info!("   GET    /product/meta/count   - Count products");
    info!("   GET    /products             - List products");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
