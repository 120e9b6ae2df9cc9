//! HTTP surface of the mint server

mod handlers;
mod responses;
mod routes;

pub use responses::*;
pub use routes::*;

use crate::config::HttpConfig;
use crate::mint::MintService;
use crate::uploads::{UploadStore, UPLOADS_PREFIX};
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use coinforge_core::ImageConstraints;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub mint_service: Arc<MintService>,
    pub uploads: Arc<UploadStore>,
    pub image_constraints: ImageConstraints,
}

impl ApiState {
    pub fn new(mint_service: Arc<MintService>, uploads: Arc<UploadStore>) -> Self {
        Self {
            mint_service,
            uploads,
            image_constraints: ImageConstraints::default(),
        }
    }
}

/// Start the API server
pub async fn start_server(
    state: ApiState,
    config: &HttpConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_router(state, config)?;

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Build the application router
pub fn create_router(state: ApiState, config: &HttpConfig) -> Result<Router> {
    let upload_dir = state.uploads.dir().to_path_buf();

    let mut app = Router::new()
        .merge(create_token_routes())
        .merge(create_health_routes())
        .nest_service(UPLOADS_PREFIX, ServeDir::new(upload_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_request_size_mb * 1024 * 1024));

    if config.enable_cors {
        let origin: HeaderValue = config.cors_origin.parse()?;
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    Ok(app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
}
