mod config;
mod db;
mod error;
mod routes;
mod service;
mod state;
mod storage;
mod templates;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "project_portal=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    storage::ensure_dirs(&config.upload_folder)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(pool.as_ref()).await?;

    let service = service::SubmissionService::new(pool, config.clone());
    let state = Arc::new(state::AppState {
        service,
        config: config.clone(),
    });

    // The original accepts uploads of any size; the limit is explicit
    // configuration rather than a framework default.
    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/submit", post(routes::submit_project))
        .route("/success", get(routes::success))
        .route("/submissions", get(routes::view_submissions))
        .route("/download/:filename", get(routes::download_file))
        .route("/view_upload/:filename", get(routes::view_upload))
        .route("/delete_submission/:id", post(routes::delete_submission))
        .route("/delete_all_submissions", post(routes::delete_all_submissions))
        .nest_service("/static", tower_http::services::ServeDir::new("static"))
        .fallback(routes::fallback)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Project portal listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
