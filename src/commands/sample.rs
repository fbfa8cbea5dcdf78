use crate::commands::{Out, Rows};
use crate::model::write_csv;
use crate::{sample, utils, Result};
use std::path::Path;

/// Writes the built-in sample dataset as CSV, to `output` or, without it, as the command's rows.
/// The file is a valid `--input` for every report.
pub async fn sample(output: Option<&Path>) -> Result<Out<Rows>> {
    let rows = sample::rows();
    let csv = write_csv(&rows)?;
    match output {
        Some(path) => {
            utils::write(path, &csv).await?;
            Ok(format!(
                "Wrote {} sample rows to '{}'",
                rows.len(),
                path.display()
            )
            .into())
        }
        None => Ok(Out::new(
            format!("{} sample rows", rows.len()),
            Rows::Csv(csv),
        )),
    }
}
