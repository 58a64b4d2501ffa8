use std::path::PathBuf;

/// File extensions accepted for upload. Matched case-insensitively against
/// the text after the last dot of the submitted file name.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "zip", "rar", "7z", "jpg", "jpeg", "png", "pptx", "txt", "mp4", "avi",
    "mov", "wmv", "flv", "mkv", "webm", "py", "js", "html", "css", "java", "cpp", "c", "php", "rb",
    "go", "sql", "json", "xml", "csv", "xlsx", "xls", "ppt", "psd", "ai", "fig", "sketch", "xd",
    "epub", "mobi", "tex", "rmd", "ipynb",
];

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_folder: PathBuf,
    pub allowed_extensions: &'static [&'static str],
    /// Maximum upload size in bytes. `None` disables the request body limit,
    /// preserving the original accept-any-size behavior.
    pub max_upload_bytes: Option<usize>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:projects.db?mode=rwc".to_string());

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let upload_folder = base_dir.join(
            std::env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "static/uploads".to_string()),
        );

        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => Some(v.parse()?),
            Err(_) => None,
        };

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);

        Ok(Self {
            database_url,
            upload_folder,
            allowed_extensions: ALLOWED_EXTENSIONS,
            max_upload_bytes,
            host,
            port,
        })
    }

    #[cfg(test)]
    pub fn for_tests(upload_folder: PathBuf) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            upload_folder,
            allowed_extensions: ALLOWED_EXTENSIONS,
            max_upload_bytes: None,
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }
}
