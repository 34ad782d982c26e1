use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    config::{AppConfig, CorsConfig, StoreBackend},
    database,
    error::{AppError, Result},
    routes,
    services::ProductService,
    store::{MemoryProductStore, PgProductStore, ProductStore},
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            products: ProductService::new(store),
        }
    }
}

pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.store.backend {
        StoreBackend::Postgres => {
            let pool = database::create_pool(&config.store.database).await?;
            Arc::new(PgProductStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory product store");
            Arc::new(MemoryProductStore::new())
        }
    };

    Ok(store)
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let store = connect_store(config).await?;
    build_with_store(config, store)
}

pub fn build_with_store(config: &AppConfig, store: Arc<dyn ProductStore>) -> Result<Router> {
    let state = AppState::new(store);
    let cors = cors_layer(&config.cors)?;

    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let allow_origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allow_origin))
}
