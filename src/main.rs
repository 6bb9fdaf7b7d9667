mod api;
mod db;
mod error;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "project_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get database path from environment or use default
    let db_path = std::env::var("PROJECT_TRACKER_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("project-tracker.db"));

    let db = db::init_database(&db_path)
        .await
        .expect("Failed to initialize database");
    tracing::info!("Database initialized at {:?}", db_path);

    let state = Arc::new(AppState { db });

    let app = api::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = std::env::var("PROJECT_TRACKER_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

    tracing::info!("Project Tracker API starting on http://{}", addr);
    tracing::info!("");
    tracing::info!("API Endpoints:");
    tracing::info!("  GET    /api/projects                - List projects with teams");
    tracing::info!("  GET    /api/projects/search         - Filter by name / progress");
    tracing::info!("  POST   /api/projects                - Create project (auto-creates employees)");
    tracing::info!("  GET    /api/projects/:id/employees  - Team of one project");
    tracing::info!("  GET    /api/employees               - List employees");
    tracing::info!("  GET    /api/employees/:id/projects  - Projects of one employee");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
