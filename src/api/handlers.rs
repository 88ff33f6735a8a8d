//! API request handlers

use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::routes::AppState;
use crate::error::Error;
use crate::number::{self, Variant};

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn dispatch_failure(variant: Variant, err: Error) -> (StatusCode, Json<ErrorResponse>) {
    tracing::warn!(%variant, "Offloaded task failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn answer(variant: Variant, started: Instant, value: u8) -> Json<u8> {
    tracing::debug!(
        %variant,
        value,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Answered"
    );
    Json(value)
}

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Return a number right away
#[utoipa::path(
    get,
    path = "/need-a-number",
    responses(
        (status = 200, description = "Integer in [1, 10]", body = u8)
    ),
    tag = "numbers"
)]
pub async fn need_a_number() -> Json<u8> {
    answer(Variant::Immediate, Instant::now(), number::draw())
}

/// Sleep on the serving thread, then return a number
///
/// The worker thread running this handler can serve nothing else while it
/// sleeps.
#[utoipa::path(
    get,
    path = "/need-a-number1",
    responses(
        (status = 200, description = "Integer in [1, 10]", body = u8)
    ),
    tag = "numbers"
)]
pub async fn need_a_number_blocking(State(state): State<AppState>) -> Json<u8> {
    let started = Instant::now();
    std::thread::sleep(state.delay);
    answer(Variant::Blocking, started, number::draw())
}

/// Sleep on the dispatcher's blocking pool, then return a number
#[utoipa::path(
    get,
    path = "/need-a-number2",
    responses(
        (status = 200, description = "Integer in [1, 10]", body = u8),
        (status = 500, description = "Blocking task failed", body = ErrorResponse)
    ),
    tag = "numbers"
)]
pub async fn need_a_number_blocking_pool(State(state): State<AppState>) -> ApiResult<Json<u8>> {
    let started = Instant::now();
    let delay = state.delay;

    let value = state
        .dispatcher
        .spawn_blocking(move || {
            std::thread::sleep(delay);
            number::draw()
        })
        .await
        .map_err(|e| dispatch_failure(Variant::BlockingPool, e))?;

    Ok(answer(Variant::BlockingPool, started, value))
}

/// Suspend on a timer, then return a number
#[utoipa::path(
    get,
    path = "/need-a-number3",
    responses(
        (status = 200, description = "Integer in [1, 10]", body = u8)
    ),
    tag = "numbers"
)]
pub async fn need_a_number_suspend(State(state): State<AppState>) -> Json<u8> {
    let started = Instant::now();
    tokio::time::sleep(state.delay).await;
    answer(Variant::Suspend, started, number::draw())
}

/// Move to the dispatcher runtime, suspend on a timer there, then return a number
#[utoipa::path(
    get,
    path = "/need-a-number4",
    responses(
        (status = 200, description = "Integer in [1, 10]", body = u8),
        (status = 500, description = "Dispatched task failed", body = ErrorResponse)
    ),
    tag = "numbers"
)]
pub async fn need_a_number_redispatched(State(state): State<AppState>) -> ApiResult<Json<u8>> {
    let started = Instant::now();
    let delay = state.delay;

    let value = state
        .dispatcher
        .spawn(async move {
            tokio::time::sleep(delay).await;
            number::draw()
        })
        .await
        .map_err(|e| dispatch_failure(Variant::SuspendRedispatched, e))?;

    Ok(answer(Variant::SuspendRedispatched, started, value))
}
