use std::net::SocketAddr;

use axum_test::TestServer;
use env_monitor::build_router;
use env_monitor::config::Config;
use env_monitor::state::AppState;

/// Test configuration: a private in-memory database per app
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        // In-memory SQLite is per connection
        database_max_connections: 1,
        seed_demo_data: false,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let state = AppState::new(test_config())
            .await
            .expect("Failed to create test app state");

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }
}

/// Serve the app on a real loopback socket, for tests driving it over HTTP
#[allow(dead_code)]
pub async fn spawn_server() -> (SocketAddr, AppState) {
    let state = AppState::new(test_config())
        .await
        .expect("Failed to create test app state");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let router = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    (addr, state)
}
