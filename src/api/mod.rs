//! Sources of sales CSV data.
//!
//! The `Source` trait hides where the export comes from: a Google Sheet (`GoogleSheet`), a local
//! file (`CsvFile`) or seeded in-memory data (`TestSource`).

mod csv_file;
mod google_sheet;
mod test_source;

use crate::model::{parse_csv, RawSalesRow};
use crate::Result;
use anyhow::Context;
use std::path::PathBuf;
use tracing::debug;

pub(crate) use csv_file::CsvFile;
pub(crate) use google_sheet::{csv_export_url, GoogleSheet};
pub(crate) use test_source::TestSource;
#[cfg(test)]
pub(crate) use test_source::SEED_DATA;

/// When this environment variable is set and non-empty, sheet URLs are served by `TestSource`
/// instead of Google.
pub const TEST_MODE_ENV: &str = "SALES_ROLLUP_IN_TEST_MODE";

/// Whether sheet URLs are fetched from Google or served from seeded test data.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    /// Returns `Mode::Test` when `SALES_ROLLUP_IN_TEST_MODE` is set to a non-empty value.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Something that can produce the sales export as CSV text.
#[async_trait::async_trait]
pub(crate) trait Source: Send {
    /// Describes the source for log and error messages.
    fn describe(&self) -> String;

    /// Fetches the whole export as CSV text.
    async fn fetch_csv(&mut self) -> Result<String>;

    /// Fetches and parses the export into rows.
    async fn rows(&mut self) -> Result<Vec<RawSalesRow>> {
        let text = self.fetch_csv().await?;
        let rows = parse_csv(&text)
            .with_context(|| format!("The data from {} is not a valid sales CSV", self.describe()))?;
        debug!("Read {} rows from {}", rows.len(), self.describe());
        Ok(rows)
    }
}

/// Creates the source for a Google Sheet URL.
pub(crate) fn sheet(sheet_url: &str, mode: Mode) -> Result<Box<dyn Source>> {
    match mode {
        Mode::Google => Ok(Box::new(GoogleSheet::new(sheet_url)?)),
        Mode::Test => {
            debug!("Test mode: serving {sheet_url} from seeded data");
            Ok(Box::new(TestSource::default()))
        }
    }
}

/// Creates the source for a local CSV file.
pub(crate) fn file(path: impl Into<PathBuf>) -> Box<dyn Source> {
    Box::new(CsvFile::new(path))
}
