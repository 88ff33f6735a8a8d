//! HTTP API layer

mod routes;
mod handlers;

pub use handlers::{ErrorResponse, HealthResponse};
pub use routes::{create_router, method_router, ApiDoc, AppState};
