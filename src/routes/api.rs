use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tera::Context;

use crate::error::AppError;
use super::pages::render_template;
use crate::state::AppState;

pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    serve_upload(&state, &filename, "attachment")
}

pub async fn view_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    serve_upload(&state, &filename, "inline")
}

/// Streams a stored upload back. Names are resolved strictly inside the
/// upload directory; anything that looks like a path is a 404, same as a
/// missing file. No authorization check, by design.
fn serve_upload(state: &AppState, filename: &str, disposition: &str) -> Response {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return not_found_page();
    }

    let path = state.config.upload_folder.join(filename);
    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(_) => return not_found_page(),
    };

    let mime = mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Response::builder()
        .header("Content-Type", mime)
        .header(
            "Content-Disposition",
            format!("{}; filename=\"{}\"", disposition, filename),
        )
        .body(axum::body::Body::from(content))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

pub async fn delete_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    // A non-numeric id gets the same JSON shape as an unknown one; the
    // delete endpoints never answer with a raw extractor rejection.
    let id: i64 = match id.parse() {
        Ok(id) => id,
        Err(_) => return not_found_json(),
    };

    match state.service.delete_one(id).await {
        Ok(()) => Json(serde_json::json!({
            "success": true,
            "message": "Submission deleted successfully"
        }))
        .into_response(),
        Err(AppError::NotFound(_)) => not_found_json(),
        Err(e) => {
            tracing::error!("Error deleting submission {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": format!("Error deleting submission: {}", e)
                })),
            )
                .into_response()
        }
    }
}

pub async fn delete_all_submissions(State(state): State<Arc<AppState>>) -> Response {
    match state.service.delete_all().await {
        Ok(count) => Json(serde_json::json!({
            "success": true,
            "message": format!("All {} submissions deleted successfully", count)
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Error deleting all submissions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": format!("Error deleting all submissions: {}", e)
                })),
            )
                .into_response()
        }
    }
}

/// 404s stay JSON for the delete endpoints and render a page elsewhere,
/// so the delete UI never has to parse HTML out of an error response.
pub async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/delete") {
        not_found_json()
    } else {
        not_found_page()
    }
}

fn not_found_json() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Resource not found"
        })),
    )
        .into_response()
}

fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        render_template("404.html", Context::new()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db;
    use crate::service::SubmissionService;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    async fn app_state(dir: &TempDir) -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        let config = Arc::new(Config::for_tests(dir.path().to_path_buf()));
        Arc::new(AppState {
            service: SubmissionService::new(Arc::new(pool), config.clone()),
            config,
        })
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn delete_with_non_numeric_id_answers_json_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(&dir).await;
        let response = delete_submission(State(state), Path("abc".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Resource not found");
    }

    #[tokio::test]
    async fn delete_with_unknown_id_answers_json_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(&dir).await;
        let response = delete_submission(State(state), Path("42".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Resource not found");
    }
}
