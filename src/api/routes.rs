//! API route definitions

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, ErrorResponse, HealthResponse};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::number::Variant;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "need-a-number API",
        version = "0.1.0",
        description = "Random numbers behind blocking and non-blocking delays"
    ),
    tags(
        (name = "numbers", description = "Number endpoints, one per waiting strategy"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::health,
        handlers::need_a_number,
        handlers::need_a_number_blocking,
        handlers::need_a_number_blocking_pool,
        handlers::need_a_number_suspend,
        handlers::need_a_number_redispatched,
    ),
    components(schemas(HealthResponse, ErrorResponse))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub delay: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(&config.dispatcher)?),
            delay: config.delay(),
        })
    }
}

/// Handler serving each variant
pub fn method_router(variant: Variant) -> MethodRouter<AppState> {
    match variant {
        Variant::Immediate => get(handlers::need_a_number),
        Variant::Blocking => get(handlers::need_a_number_blocking),
        Variant::BlockingPool => get(handlers::need_a_number_blocking_pool),
        Variant::Suspend => get(handlers::need_a_number_suspend),
        Variant::SuspendRedispatched => get(handlers::need_a_number_redispatched),
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    let router = Variant::ALL
        .into_iter()
        .fold(Router::new(), |router, variant| {
            router.route(variant.path(), method_router(variant))
        });

    router
        // Health
        .route("/health", get(handlers::health))

        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
