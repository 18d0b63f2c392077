use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sdk_demo::config::Config;
use sdk_demo::handlers::{StartTestResponse, TestApiListResponse, TestProgressResponse};
use sdk_demo::models::TestApi;
use sdk_demo::state::AppState;
use sdk_demo::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::api_test::all_api_test,
        handlers::api_test::test_progress,
        handlers::api_test::get_test_api_list,
    ),
    components(schemas(
        StartTestResponse,
        TestProgressResponse,
        TestApiListResponse,
        TestApi,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "API Tests", description = "Batch tests against the vendor SDK")
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
    let config = Config::load().expect("Failed to load configuration");
    let addr = config.server_addr();

    // Initialize application state (connects to the database)
    tracing::info!("Connecting to database...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");
    tracing::info!("Database connection established");

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
