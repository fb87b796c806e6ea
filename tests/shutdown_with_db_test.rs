//! Shutdown behaviour while database connections are checked out.
//!
//! Needs TEST_DATABASE_URL, like `records_with_db_test`.

use std::time::{Duration, Instant};
use tier_demo_api::api::AppState;
use tier_demo_api::config::{DatabaseConfig, PoolOptions};
use tier_demo_api::db::DbPool;
use tier_demo_api::transport::HttpTransport;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

fn pool() -> Option<DbPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return None;
        }
    };

    let config = DatabaseConfig::from_url(&url).unwrap();
    // One connection, and acquires that wait far longer than the test runs
    let options = PoolOptions {
        max_connections: 1,
        connect_timeout: Duration::from_secs(30),
        ..PoolOptions::default()
    };
    Some(DbPool::connect_lazy(&config, &options))
}

#[tokio::test]
async fn test_forced_shutdown_does_not_wait_for_checked_out_connections() {
    let Some(pool) = pool() else {
        return;
    };

    // Stands in for a long query: holds the only connection for the whole test
    let held = pool.pg().acquire().await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // This request blocks in the handler waiting for a connection, so the
    // graceful drain can never finish on its own.
    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET /api/data HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let transport = HttpTransport::new(AppState::new(pool.clone()), "127.0.0.1", addr.port());
    let started = Instant::now();
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        transport.serve(
            listener,
            tokio::time::sleep(Duration::from_millis(300)),
            tokio::time::sleep(Duration::from_millis(300)),
        ),
    )
    .await
    .expect("forced shutdown should not hang on the held connection");

    assert!(result.is_ok());
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "took {:?}",
        started.elapsed()
    );
    assert!(pool.pg().is_closed());

    drop(held);
    drop(client);
}
