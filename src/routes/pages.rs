use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tera::Context;

use crate::error::AppError;
use crate::service::{FileUpload, SubmissionForm};
use crate::state::AppState;

pub async fn index() -> impl IntoResponse {
    render_template("index.html", Context::new())
}

pub async fn success() -> impl IntoResponse {
    render_template("success.html", Context::new())
}

pub async fn submit_project(
    State(state): State<Arc<AppState>>,
    mut multipart: axum::extract::Multipart,
) -> Response {
    let mut form = SubmissionForm::default();
    let mut upload: Option<FileUpload> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "student_name" => form.student_name = field.text().await.unwrap_or_default(),
            "email" => form.email = field.text().await.unwrap_or_default(),
            "project_title" => form.project_title = field.text().await.unwrap_or_default(),
            "project_description" => {
                form.project_description = field.text().await.unwrap_or_default()
            }
            "project_url" => form.project_url = Some(field.text().await.unwrap_or_default()),
            "linkedin_url" => form.linkedin_url = Some(field.text().await.unwrap_or_default()),
            "project_file" => {
                // An empty file name means no file was chosen in the form.
                let original = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.unwrap_or_default();
                if !original.is_empty() {
                    upload = Some(FileUpload {
                        original_filename: original,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    match state.service.submit(form, upload).await {
        Ok(_) => Redirect::to("/success").into_response(),
        Err(AppError::Validation(message)) => form_error(StatusCode::BAD_REQUEST, &message),
        Err(e) => {
            tracing::error!("Failed to create submission: {}", e);
            form_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("An error occurred while submitting your project: {}", e),
            )
        }
    }
}

pub async fn view_submissions(State(state): State<Arc<AppState>>) -> Response {
    match state.service.list().await {
        Ok(submissions) => {
            let mut ctx = Context::new();
            ctx.insert("submissions", &submissions);
            render_template("submissions.html", ctx).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list submissions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                render_template("500.html", Context::new()),
            )
                .into_response()
        }
    }
}

fn form_error(status: StatusCode, message: &str) -> Response {
    let mut ctx = Context::new();
    ctx.insert("error", message);
    (status, render_template("index.html", ctx)).into_response()
}

pub(crate) fn render_template(name: &str, ctx: Context) -> Response {
    let tera = crate::templates::get_tera();
    match tera.render(name, &ctx) {
        Ok(rendered) => Html(rendered).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {}", name, e);
            let body = tera
                .render("500.html", &Context::new())
                .unwrap_or_else(|_| "Internal server error".to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template_renders_as_server_error() {
        let response = render_template("does_not_exist.html", Context::new());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
