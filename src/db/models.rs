use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One student project entry. Immutable once created; `stored_filename` and
/// `stored_file_path` are either both set or both absent (enforced by a
/// table CHECK constraint as well as the service).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub student_name: String,
    pub email: String,
    pub project_title: String,
    pub project_description: String,
    pub project_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub stored_filename: Option<String>,
    pub stored_file_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Field values for a submission about to be inserted. `id` is assigned by
/// the store; `submitted_at` is the creation instant chosen by the service.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub student_name: String,
    pub email: String,
    pub project_title: String,
    pub project_description: String,
    pub project_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub stored_filename: Option<String>,
    pub stored_file_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
