use crate::catalog::{CatalogApi, TmdbCatalog};
use crate::config::Config;
use crate::proxy::handle_proxy;
use crate::views::{self, ViewContext};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub views: Arc<ViewContext>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogApi>, config: &Config) -> Self {
        Self {
            catalog,
            views: Arc::new(ViewContext {
                image_base: config.image_base.clone(),
                site_origin: config.site_origin.clone(),
            }),
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let catalog: Arc<dyn CatalogApi> = Arc::new(TmdbCatalog::new(&config)?);
    let state = AppState::new(catalog, &config);

    let app = build_router(state);

    info!("Listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tmdb", get(handle_proxy))
        .route("/api/account", get(views::account))
        .route("/api/pages/home", get(views::home_page))
        .route("/api/pages/browse", get(views::browse_page))
        .route("/api/pages/search", get(views::search_page))
        .route("/api/pages/movie/:id", get(views::movie_page))
        .route("/api/pages/watch/:id", get(views::watch_page))
        .route("/api/pages/download/:id", get(views::download_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
