//! Serving runtime, listener and shutdown handling

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::runtime::{Builder, Runtime};

use crate::api::{self, AppState};
use crate::config::{Config, RuntimeConfig};
use crate::error::Result;
use crate::number::Variant;

/// Build the multi-thread runtime that accepts and serves connections
///
/// Its worker count is the pool size that bounds how many thread-blocking
/// requests can be in flight at once.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name("serving")
        .enable_all()
        .build()?;
    Ok(runtime)
}

/// Serve the API on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = api::create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
pub async fn run(config: Config) -> Result<()> {
    let addr = config.addr()?;
    let state = AppState::new(&config)?;
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        addr = %local_addr,
        worker_threads = config.runtime.worker_threads,
        max_blocking_threads = config.dispatcher.max_blocking_threads,
        delay_ms = config.number.delay_ms,
        "Starting need-a-number server"
    );
    print_banner(local_addr);

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn print_banner(addr: SocketAddr) {
    println!("need-a-number server running at http://{}", addr);
    for variant in Variant::ALL {
        println!("  {:<16} {}", variant.path(), variant.strategy());
    }
    println!("  {:<16} API docs", "/api/docs");
    println!("  {:<16} health", "/health");
}

/// Resolve on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}
