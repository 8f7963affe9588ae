//! Router assembly and API server startup.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::docs::ApiDoc;
use crate::api::handlers::{
    create_nlb_handler, delete_all_nlbs_handler, delete_nlb_handler, get_nlb_handler,
    health_handler, list_nlbs_handler,
};
use crate::config::ServerConfig;
use crate::errors::{Error, Result};
use crate::services::NlbService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<NlbService>,
}

impl ApiState {
    pub fn new(service: Arc<NlbService>) -> Self {
        Self { service }
    }
}

/// Build the API router over the given state.
pub fn build_router(state: ApiState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/ns/{namespace}/nlb",
            post(create_nlb_handler).get(list_nlbs_handler).delete(delete_all_nlbs_handler),
        )
        .route("/ns/{namespace}/nlb/{id}", get(get_nlb_handler).delete(delete_nlb_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Bind the configured address and serve the API until shutdown.
pub async fn start_api_server(config: &ServerConfig, state: ApiState) -> Result<()> {
    let router = build_router(state, config.enable_cors);
    let bind_address = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&bind_address).await.map_err(|e| Error::Io {
        source: e,
        context: format!("failed to bind API server to {}", bind_address),
    })?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received for API server");
        })
        .await
        .map_err(|e| Error::Io { source: e, context: "API server terminated".to_string() })
}
