//! Downloads a Google Sheet tab through its CSV export URL.
//!
//! The sheet has to be readable by anyone with the link; no OAuth is involved.

use crate::api::Source;
use crate::Result;
use anyhow::{bail, Context};
use std::time::Duration;
use tracing::trace;
use url::Url;

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";
const DEFAULT_GID: &str = "0";
const TIMEOUT: Duration = Duration::from_secs(30);

/// Implements `Source` by downloading the CSV export of one tab of a Google Sheet.
pub(crate) struct GoogleSheet {
    export_url: Url,
    client: reqwest::Client,
}

impl GoogleSheet {
    /// Creates a `GoogleSheet` from the URL a user would copy out of the browser, e.g.
    /// `https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/edit#gid=12345`.
    pub(crate) fn new(sheet_url: &str) -> Result<Self> {
        let export_url = csv_export_url(sheet_url)?;
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { export_url, client })
    }
}

#[async_trait::async_trait]
impl Source for GoogleSheet {
    fn describe(&self) -> String {
        format!("Google Sheet export '{}'", self.export_url)
    }

    async fn fetch_csv(&mut self) -> Result<String> {
        trace!("GET {}", self.export_url);
        let response = self
            .client
            .get(self.export_url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to request {}", self.export_url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Failed to fetch {}: {status}", self.export_url);
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read the response body from {}", self.export_url))
    }
}

/// Converts a Google Sheets URL into the URL of the CSV export of the same tab.
///
/// The tab is taken from `gid=N` in the fragment (as the browser shows it) or the query, and
/// defaults to the first tab.
pub(crate) fn csv_export_url(sheet_url: &str) -> Result<Url> {
    let url = Url::parse(sheet_url.trim())
        .with_context(|| format!("'{sheet_url}' is not a valid URL"))?;
    let spreadsheet_id = extract_spreadsheet_id(&url)?;
    let gid = extract_gid(&url).unwrap_or_else(|| DEFAULT_GID.to_string());
    let export = format!("{EXPORT_BASE}/{spreadsheet_id}/export?format=csv&gid={gid}");
    Url::parse(&export).with_context(|| format!("Unable to build the export URL for '{sheet_url}'"))
}

/// Extracts the spreadsheet ID, the path segment following `d`.
fn extract_spreadsheet_id(url: &Url) -> Result<String> {
    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    match segments.iter().position(|s| *s == "d") {
        Some(ix) => match segments.get(ix + 1) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => bail!("The Google Sheets URL '{url}' is missing the spreadsheet ID"),
        },
        None => bail!(
            "Invalid Google Sheets URL format '{url}'. Expected: \
            https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
        ),
    }
}

/// Finds the numeric `gid` in the fragment, then in the query.
fn extract_gid(url: &Url) -> Option<String> {
    let from_fragment = url.fragment().and_then(|fragment| {
        fragment
            .split('&')
            .find_map(|pair| pair.strip_prefix("gid="))
            .map(str::to_string)
    });
    from_fragment
        .or_else(|| {
            url.query_pairs()
                .find(|(key, _)| key == "gid")
                .map(|(_, value)| value.into_owned())
        })
        .map(|gid| gid.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
        .filter(|gid| !gid.is_empty())
}
