//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use need_a_number::api::AppState;
use need_a_number::config::Config;
use need_a_number::server;

/// Config with small pools and the given delay
pub fn test_config(delay: Duration) -> Config {
    let mut config = Config::default();
    config.runtime.worker_threads = 2;
    config.dispatcher.worker_threads = 1;
    config.dispatcher.max_blocking_threads = 2;
    config.number.delay_ms = delay.as_millis() as u64;
    config
}

/// A server running on its own serving runtime, bound to 127.0.0.1:0
///
/// The runtime lives on a dedicated thread so that blocking handlers stall
/// the server's workers and not the test's.
pub struct TestServer {
    pub addr: SocketAddr,
    pub config: Config,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn start(config: Config) -> Self {
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_config = config.clone();

        std::thread::spawn(move || {
            let runtime = server::build_runtime(&server_config.runtime)
                .expect("Failed to build serving runtime");

            runtime.block_on(async move {
                let state = AppState::new(&server_config).expect("Failed to create state");
                let listener = TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind listener");
                addr_tx
                    .send(listener.local_addr().expect("No local address"))
                    .expect("Test dropped before server started");

                server::serve(listener, state, async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server failed");
            });
        });

        let addr = addr_rx.recv().expect("Server thread exited early");

        Self {
            addr,
            config,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn delay(&self) -> Duration {
        self.config.delay()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// GET a number endpoint and decode the bare integer body
pub async fn fetch_number(client: &reqwest::Client, url: &str) -> u8 {
    let response = client.get(url).send().await.expect("Request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json::<u8>().await.expect("Body is not an integer")
}
