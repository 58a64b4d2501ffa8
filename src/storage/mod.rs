use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars() -> &'static Regex {
    UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap())
}

/// Checks the text after the last dot against the allow-list,
/// case-insensitively. Names without a dot are rejected.
pub fn has_allowed_extension(filename: &str, allowed: &[&str]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            allowed.iter().any(|a| *a == ext)
        }
        None => false,
    }
}

/// Reduces a user-supplied file name to a filesystem-safe leaf name.
///
/// Path separators and anything outside `[A-Za-z0-9_.-]` become underscores,
/// then leading and trailing dots/underscores are trimmed so relative-path
/// prefixes cannot survive: `"../../etc/passwd"` comes out as `"etc_passwd"`.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned = unsafe_chars().replace_all(filename, "_");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Final on-disk name: creation timestamp prefix plus the sanitized original
/// name, so identical uploads in different seconds never collide.
pub fn stored_filename(at: DateTime<Utc>, original: &str) -> String {
    format!("{}_{}", at.format("%Y%m%d_%H%M%S"), sanitize_filename(original))
}

/// Writes the full upload to `dir/stored_name`. No size cap here; any limit
/// is applied at the HTTP body layer.
pub fn save_upload(dir: &Path, stored_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    let path = dir.join(stored_name);
    std::fs::write(&path, data)?;
    Ok(path)
}

pub fn remove_upload(path: &Path) -> std::io::Result<()> {
    std::fs::remove_file(path)
}

pub fn ensure_dirs(upload_folder: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(upload_folder)
}
