use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{self, DbPool, NewSubmission, Submission};
use crate::error::{AppError, AppResult};
use crate::storage;

/// Form fields from the submission page. The four required fields are
/// validated here, not at the HTTP layer.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub student_name: String,
    pub email: String,
    pub project_title: String,
    pub project_description: String,
    pub project_url: Option<String>,
    pub linkedin_url: Option<String>,
}

/// An uploaded file as received: the browser-stated name plus full content.
#[derive(Debug)]
pub struct FileUpload {
    pub original_filename: String,
    pub data: Vec<u8>,
}

/// Orchestrates validation, file storage and record persistence.
pub struct SubmissionService {
    pool: DbPool,
    config: Arc<Config>,
}

impl SubmissionService {
    pub fn new(pool: DbPool, config: Arc<Config>) -> Self {
        Self { pool, config }
    }

    /// Creates a submission. Validation happens before any side effect; a
    /// failed file write aborts before the insert; a failed insert after a
    /// successful write leaves the file behind as an accepted orphan.
    pub async fn submit(
        &self,
        form: SubmissionForm,
        upload: Option<FileUpload>,
    ) -> AppResult<Submission> {
        self.submit_at(form, upload, Utc::now()).await
    }

    pub(crate) async fn submit_at(
        &self,
        form: SubmissionForm,
        upload: Option<FileUpload>,
        now: DateTime<Utc>,
    ) -> AppResult<Submission> {
        let required = [
            &form.student_name,
            &form.email,
            &form.project_title,
            &form.project_description,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::Validation(
                "Please fill all required fields".to_string(),
            ));
        }

        let mut stored_filename = None;
        let mut stored_file_path = None;

        if let Some(upload) = upload {
            if !storage::has_allowed_extension(
                &upload.original_filename,
                self.config.allowed_extensions,
            ) {
                return Err(AppError::Validation("File type not allowed".to_string()));
            }

            let name = storage::stored_filename(now, &upload.original_filename);
            let path = storage::save_upload(&self.config.upload_folder, &name, &upload.data)?;

            tracing::info!(file = %name, bytes = upload.data.len(), "stored upload");
            stored_file_path = Some(path.to_string_lossy().into_owned());
            stored_filename = Some(name);
        }

        let submission = db::create_submission(
            &self.pool,
            NewSubmission {
                student_name: form.student_name.trim().to_string(),
                email: form.email.trim().to_string(),
                project_title: form.project_title.trim().to_string(),
                project_description: form.project_description.trim().to_string(),
                project_url: form.project_url.filter(|u| !u.trim().is_empty()),
                linkedin_url: form.linkedin_url.filter(|u| !u.trim().is_empty()),
                stored_filename: stored_filename.clone(),
                stored_file_path,
                submitted_at: now,
            },
        )
        .await
        .map_err(|e| {
            if let Some(name) = &stored_filename {
                // The written file is not cleaned up; orphans are accepted.
                tracing::warn!(file = %name, "insert failed after file write, file left on disk");
            }
            AppError::Persistence(e)
        })?;

        Ok(submission)
    }

    pub async fn list(&self) -> AppResult<Vec<Submission>> {
        Ok(db::list_submissions(&self.pool).await?)
    }

    /// Deletes one submission. File removal is best-effort: a missing or
    /// undeletable file is logged and the record is still removed.
    pub async fn delete_one(&self, id: i64) -> AppResult<()> {
        let submission = db::get_submission(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("submission {}", id)))?;

        remove_stored_file(&submission);

        if !db::delete_submission(&self.pool, id).await? {
            return Err(AppError::NotFound(format!("submission {}", id)));
        }
        Ok(())
    }

    /// Deletes every submission, removing stored files best-effort first.
    /// Returns the number of records removed.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let submissions = db::list_submissions(&self.pool).await?;
        for submission in &submissions {
            remove_stored_file(submission);
        }

        Ok(db::delete_all_submissions(&self.pool).await?)
    }
}

fn remove_stored_file(submission: &Submission) {
    let Some(path) = &submission.stored_file_path else {
        return;
    };
    let path = Path::new(path);
    if !path.exists() {
        return;
    }
    if let Err(e) = storage::remove_upload(path) {
        tracing::warn!(id = submission.id, path = %path.display(), error = %e,
            "could not delete stored file, continuing");
    }
}
