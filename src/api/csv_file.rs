use crate::api::Source;
use crate::{utils, Result};
use std::path::PathBuf;
use tracing::trace;

/// Reads the export from a CSV file on disk.
pub(crate) struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Source for CsvFile {
    fn describe(&self) -> String {
        format!("file '{}'", self.path.display())
    }

    async fn fetch_csv(&mut self) -> Result<String> {
        trace!("reading {}", self.path.display());
        utils::read(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_csv_file_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        utils::write(
            &path,
            "商品名,商品管理番号,商品番号,平均単価,売上個数,売上,売上件数\nTee,abc1,1,\"1,000\",1,\"1,000\",1\n",
        )
        .await
        .unwrap();
        let mut source = CsvFile::new(&path);
        let rows = source.rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].management_code, "abc1");
    }

    #[tokio::test]
    async fn test_csv_file_missing() {
        let dir = TempDir::new().unwrap();
        let mut source = CsvFile::new(dir.path().join("nope.csv"));
        assert!(source.rows().await.is_err());
    }

    #[tokio::test]
    async fn test_csv_file_not_sales_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.csv");
        utils::write(&path, "a,b\n1,2\n").await.unwrap();
        let err = CsvFile::new(&path).rows().await.unwrap_err();
        assert!(err.to_string().contains("not a valid sales CSV"));
    }
}
