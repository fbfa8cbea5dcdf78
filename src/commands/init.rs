use crate::api::csv_export_url;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Creates the data directory and an initial `config.json` file.
///
/// # Arguments
/// - `sales_home` - The directory that will hold the config, e.g. `$HOME/sales`
/// - `sheet_url` - The URL of the Google Sheet holding the sales export, if there is one.
///   e.g. https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
///
/// # Errors
/// - Returns an error if the sheet URL is not a Google Sheets URL, the config already exists or
///   any file operation fails.
pub async fn init(sales_home: &Path, sheet_url: Option<&str>) -> Result<Out<()>> {
    let sheet_url = sheet_url.map(str::trim).unwrap_or_default();
    if !sheet_url.is_empty() {
        let export_url = csv_export_url(sheet_url)?;
        debug!("The sheet will be read from {export_url}");
    }
    let config = Config::create(sales_home, sheet_url)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the sales config at '{}'",
        config.config_path().display()
    )
    .into())
}
