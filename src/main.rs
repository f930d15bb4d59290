use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use env_monitor::config::Config;
use env_monitor::handlers::{
    CreateEnvironmentRequest, EnvironmentResponse, HealthResponse, UpdateEnvironmentRequest,
};
use env_monitor::state::AppState;
use env_monitor::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::environment::list_environments,
        handlers::environment::get_environment,
        handlers::environment::create_environment,
        handlers::environment::update_environment,
        handlers::environment::delete_environment,
    ),
    components(schemas(
        HealthResponse,
        CreateEnvironmentRequest,
        UpdateEnvironmentRequest,
        EnvironmentResponse,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Environments", description = "Environment status management endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let addr = config.server_addr();

    // Initialize application state (opens the database and runs migrations)
    tracing::info!(database_url = %config.database_url, "Opening database...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");
    tracing::info!("Database ready");

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Environment Monitor backend running on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API endpoint: http://{}/api/environments", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
