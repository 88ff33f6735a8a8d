//! End-to-end latency and throughput tests
//! Each test starts a server on its own runtime and drives it over real sockets

use std::time::{Duration, Instant};

use futures::future::join_all;

use need_a_number::config::Config;
use need_a_number::number::{Variant, NUMBER_RANGE};

mod common;

use common::{fetch_number, test_config, TestServer};

/// Fire `count` concurrent requests and return the time until the last answer
async fn burst(server: &TestServer, variant: Variant, count: usize) -> Duration {
    let client = reqwest::Client::new();
    let url = server.url(variant.path());
    let start = Instant::now();

    let numbers = join_all((0..count).map(|_| fetch_number(&client, &url))).await;

    let elapsed = start.elapsed();
    assert_eq!(numbers.len(), count);
    assert!(numbers.iter().all(|n| NUMBER_RANGE.contains(n)));
    elapsed
}

// ============================================================================
// Single-request latency
// ============================================================================

mod latency_tests {
    use super::*;

    #[tokio::test]
    async fn test_immediate_answers_quickly() {
        let server = TestServer::start(test_config(Duration::from_millis(500)));
        let client = reqwest::Client::new();

        let start = Instant::now();
        let n = fetch_number(&client, &server.url("/need-a-number")).await;

        assert!(NUMBER_RANGE.contains(&n));
        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_suspend_takes_one_second_by_default() {
        let mut config = test_config(Duration::ZERO);
        config.number.delay_ms = Config::default().number.delay_ms;
        let server = TestServer::start(config);
        let client = reqwest::Client::new();

        let start = Instant::now();
        let n = fetch_number(&client, &server.url("/need-a-number3")).await;
        let elapsed = start.elapsed();

        assert!(NUMBER_RANGE.contains(&n));
        assert!(elapsed >= Duration::from_secs(1), "took {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1_500), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_each_delayed_variant_waits_once() {
        let server = TestServer::start(test_config(Duration::from_millis(200)));
        let client = reqwest::Client::new();

        for variant in Variant::ALL.into_iter().filter(|v| v.is_delayed()) {
            let start = Instant::now();
            fetch_number(&client, &server.url(variant.path())).await;
            let elapsed = start.elapsed();

            assert!(elapsed >= server.delay(), "{} took {:?}", variant, elapsed);
            assert!(
                elapsed < server.delay() + Duration::from_millis(500),
                "{} took {:?}",
                variant,
                elapsed
            );
        }
    }
}

// ============================================================================
// Concurrent bursts
// ============================================================================

mod throughput_tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);
    const BURST: usize = 8;

    #[tokio::test]
    async fn test_thread_blocking_scales_with_worker_count() {
        let server = TestServer::start(test_config(DELAY));
        let workers = server.config.runtime.worker_threads;

        let elapsed = burst(&server, Variant::Blocking, BURST).await;

        // Only `workers` sleeps can run at once.
        let rounds = BURST.div_ceil(workers) as u32;
        assert!(
            elapsed >= DELAY * rounds - Duration::from_millis(20),
            "{} requests on {} workers took {:?}",
            BURST,
            workers,
            elapsed
        );
        assert!(
            elapsed < DELAY * (rounds + 2),
            "{} requests on {} workers took {:?}, expected about {} rounds",
            BURST,
            workers,
            elapsed,
            rounds
        );
    }

    #[tokio::test]
    async fn test_blocking_pool_scales_with_pool_size() {
        let server = TestServer::start(test_config(DELAY));
        let pool = server.config.dispatcher.max_blocking_threads;

        let elapsed = burst(&server, Variant::BlockingPool, BURST).await;

        let rounds = BURST.div_ceil(pool) as u32;
        assert!(
            elapsed >= DELAY * rounds - Duration::from_millis(20),
            "{} requests on a pool of {} took {:?}",
            BURST,
            pool,
            elapsed
        );
        assert!(
            elapsed < DELAY * (rounds + 2),
            "{} requests on a pool of {} took {:?}, expected about {} rounds",
            BURST,
            pool,
            elapsed,
            rounds
        );
    }

    #[tokio::test]
    async fn test_suspension_completes_in_about_one_delay() {
        let server = TestServer::start(test_config(DELAY));

        let elapsed = burst(&server, Variant::Suspend, 32).await;

        assert!(elapsed >= DELAY);
        assert!(elapsed < DELAY * 3, "32 suspended requests took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_redispatched_suspension_completes_in_about_one_delay() {
        let server = TestServer::start(test_config(DELAY));

        let elapsed = burst(&server, Variant::SuspendRedispatched, 32).await;

        assert!(elapsed >= DELAY);
        assert!(elapsed < DELAY * 3, "32 redispatched requests took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_blocking_pool_leaves_serving_workers_free() {
        let server = TestServer::start(test_config(Duration::from_millis(600)));
        let client = reqwest::Client::new();

        let slow_url = server.url(Variant::BlockingPool.path());
        let slow: Vec<_> = (0..4)
            .map(|_| {
                let client = client.clone();
                let url = slow_url.clone();
                tokio::spawn(async move { fetch_number(&client, &url).await })
            })
            .collect();

        // Let the slow requests reach the pool.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let start = Instant::now();
        fetch_number(&client, &server.url("/need-a-number")).await;
        assert!(
            start.elapsed() < Duration::from_millis(300),
            "immediate request waited {:?}",
            start.elapsed()
        );

        for handle in slow {
            let n = handle.await.unwrap();
            assert!(NUMBER_RANGE.contains(&n));
        }
    }
}
