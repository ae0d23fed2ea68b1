use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it and any missing parents.
pub async fn ensure_dir(path: &Path) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(path).await?;
    Ok(path.to_path_buf())
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with("~/") || path.starts_with("~\\") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}
