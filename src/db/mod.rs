mod models;

pub use models::*;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub type DbPool = Arc<SqlitePool>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub async fn create_submission(
    pool: &SqlitePool,
    new: NewSubmission,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        r#"
        INSERT INTO submissions
            (student_name, email, project_title, project_description,
             project_url, linkedin_url, stored_filename, stored_file_path, submitted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(new.student_name)
    .bind(new.email)
    .bind(new.project_title)
    .bind(new.project_description)
    .bind(new.project_url)
    .bind(new.linkedin_url)
    .bind(new.stored_filename)
    .bind(new.stored_file_path)
    .bind(new.submitted_at)
    .fetch_one(pool)
    .await
}

/// Newest first. Full table scan every call; fine at expected volume but a
/// known scaling ceiling.
pub async fn list_submissions(pool: &SqlitePool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions ORDER BY submitted_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_submission(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns whether a row was actually removed.
pub async fn delete_submission(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes every record in a single statement, so either all rows disappear
/// or none do. Returns the number removed.
pub async fn delete_all_submissions(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM submissions")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn test_pool() -> DbPool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        Arc::new(pool)
    }

    fn entry(name: &str, secs: u32) -> NewSubmission {
        NewSubmission {
            student_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            project_title: "Title".to_string(),
            project_description: "Description".to_string(),
            project_url: None,
            linkedin_url: None,
            stored_filename: None,
            stored_file_path: None,
            submitted_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, secs).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_in_order() {
        let pool = test_pool().await;
        let first = create_submission(&pool, entry("Ana", 0)).await.unwrap();
        let second = create_submission(&pool, entry("Ben", 1)).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(first.student_name, "Ana");
        assert_eq!(first.stored_filename, None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_deletion() {
        let pool = test_pool().await;
        let first = create_submission(&pool, entry("Ana", 0)).await.unwrap();
        assert!(delete_submission(&pool, first.id).await.unwrap());
        let second = create_submission(&pool, entry("Ben", 1)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = test_pool().await;
        for (i, name) in ["Ana", "Ben", "Cleo"].iter().enumerate() {
            create_submission(&pool, entry(name, i as u32)).await.unwrap();
        }
        let all = list_submissions(&pool).await.unwrap();
        assert_eq!(all.len(), 3);
        let names: Vec<_> = all.iter().map(|s| s.student_name.as_str()).collect();
        assert_eq!(names, ["Cleo", "Ben", "Ana"]);
    }

    #[tokio::test]
    async fn delete_missing_row_reports_false() {
        let pool = test_pool().await;
        assert!(!delete_submission(&pool, 42).await.unwrap());
    }

    #[tokio::test]
    async fn delete_all_returns_count() {
        let pool = test_pool().await;
        for i in 0..3 {
            create_submission(&pool, entry("Ana", i)).await.unwrap();
        }
        assert_eq!(delete_all_submissions(&pool).await.unwrap(), 3);
        assert!(list_submissions(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filename_without_path_is_rejected() {
        let pool = test_pool().await;
        let mut bad = entry("Ana", 0);
        bad.stored_filename = Some("20240101_120000_report.pdf".to_string());
        assert!(create_submission(&pool, bad).await.is_err());
    }
}
