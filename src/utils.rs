use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Create a directory and all of its parents if they do not exist.
pub(crate) async fn make_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory at {}", path.to_string_lossy()))
}

/// Resolve `path` into an absolute path with symlinks followed. The path must exist.
pub(crate) async fn canonicalize(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        write(&path, "hello").await.unwrap();
        assert_eq!(read(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_read_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let err = read(&path).await.unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }

    #[tokio::test]
    async fn test_make_dir_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        make_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(canonicalize(&nested).await.unwrap().is_absolute());
    }
}
