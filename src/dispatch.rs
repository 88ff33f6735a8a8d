//! Isolated runtime for offloaded work
//!
//! The [`Dispatcher`] owns a tokio runtime separate from the one serving HTTP
//! connections. Blocking calls submitted through [`Dispatcher::spawn_blocking`]
//! run on its bounded blocking pool, so they never occupy a serving worker.
//! Futures submitted through [`Dispatcher::spawn`] run on its async workers.

use std::future::Future;

use futures::FutureExt;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::config::DispatcherConfig;
use crate::error::{Error, Result};

pub struct Dispatcher {
    runtime: Option<Runtime>,
    handle: Handle,
    max_blocking_threads: usize,
}

impl Dispatcher {
    pub fn new(config: &DispatcherConfig) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .max_blocking_threads(config.max_blocking_threads)
            .thread_name("dispatcher")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();

        tracing::debug!(
            worker_threads = config.worker_threads,
            max_blocking_threads = config.max_blocking_threads,
            "Dispatcher runtime started"
        );

        Ok(Self {
            runtime: Some(runtime),
            handle,
            max_blocking_threads: config.max_blocking_threads,
        })
    }

    /// Run a future on the dispatcher's async workers
    pub fn spawn<F>(&self, future: F) -> impl Future<Output = Result<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle
            .spawn(future)
            .map(|joined| joined.map_err(Error::from))
    }

    /// Run a blocking closure on the dispatcher's blocking pool
    pub fn spawn_blocking<F, R>(&self, f: F) -> impl Future<Output = Result<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle
            .spawn_blocking(f)
            .map(|joined| joined.map_err(Error::from))
    }

    pub fn max_blocking_threads(&self) -> usize {
        self.max_blocking_threads
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // A plain drop panics when it happens inside another runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max_blocking_threads", &self.max_blocking_threads)
            .finish_non_exhaustive()
    }
}
