//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::{utils, Config};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const TEST_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit#gid=0";

/// Test environment that sets up a sales home directory with a Config pointing at a sheet URL.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a config file in `<tempdir>/sales`.
    pub(crate) async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().join("sales");
        let config = Config::create(&home, TEST_SHEET_URL).await.unwrap();
        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub(crate) fn config(&self) -> Config {
        self.config.clone()
    }

    /// The temp directory, outside of the sales home.
    pub(crate) fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` to `name` in the temp directory and returns its path.
    pub(crate) async fn write_csv(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root().join(name);
        utils::write(&path, contents).await.unwrap();
        path
    }
}
