use crate::api::{self, Mode, Source};
use crate::args::InputArgs;
use crate::model::RawSalesRow;
use crate::{sample, Config, Result};
use anyhow::bail;
use tracing::{debug, info};

/// The rows a report is built from, and where they came from.
#[derive(Debug, Clone)]
pub(crate) struct Dataset {
    pub(crate) origin: String,
    pub(crate) rows: Vec<RawSalesRow>,
}

/// Reads the rows selected by `input`: the sample data, a CSV file, the given sheet URL or, when
/// none of those is given, the sheet URL from the config.
///
/// A sheet URL passed on the command line is remembered in the config once it has been read.
pub(crate) async fn load(config: &mut Config, input: &InputArgs, mode: Mode) -> Result<Dataset> {
    if input.sample() {
        let today = chrono::Local::now().date_naive();
        let rows = sample::with_synthetic_dates(sample::rows(), today);
        debug!("Using {} sample rows dated around {today}", rows.len());
        return Ok(Dataset {
            origin: "the sample data".to_string(),
            rows,
        });
    }

    if let Some(path) = input.input() {
        let mut source = api::file(path);
        let rows = source.rows().await?;
        return Ok(Dataset {
            origin: source.describe(),
            rows,
        });
    }

    let (sheet_url, from_args) = match (input.sheet_url(), config.sheet_url()) {
        (Some(url), _) => (url.to_string(), true),
        (None, Some(url)) => (url.to_string(), false),
        (None, None) => bail!(
            "There is nothing to read. Pass --input, --sheet-url or --sample, or run \
            'sales init --sheet-url URL' to configure a Google Sheet"
        ),
    };

    let mut source = api::sheet(&sheet_url, mode)?;
    info!("Reading {}", source.describe());
    let rows = source.rows().await?;
    if from_args {
        config.remember_sheet_url(&sheet_url).await?;
    }
    Ok(Dataset {
        origin: source.describe(),
        rows,
    })
}
