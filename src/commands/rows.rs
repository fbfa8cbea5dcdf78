//! Renders report tables as Markdown, CSV or JSON.

use crate::args::OutputFormat;
use crate::model::{format_count, Yen};
use crate::Result;
use anyhow::Context;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Report rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// The structured report as JSON.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Rows {
    /// Renders `table` for `OutputFormat::Table` and `OutputFormat::Csv`, and `data` for
    /// `OutputFormat::Json`.
    pub(crate) fn render<T>(format: OutputFormat, table: &Table, data: &T) -> Result<Self>
    where
        T: Serialize,
    {
        Ok(match format {
            OutputFormat::Table => Rows::Table(table.markdown()),
            OutputFormat::Csv => Rows::Csv(table.csv()?),
            OutputFormat::Json => Rows::Json(
                serde_json::to_value(data).context("Unable to serialize the report as JSON")?,
            ),
        })
    }
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s.trim_end()),
            Rows::Csv(s) => write!(f, "{}", s.trim_end()),
        }
    }
}

/// One table cell. Figures are formatted for Markdown and written plain for CSV.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Count(i64),
    Yen(Decimal),
}

impl Cell {
    pub(crate) fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn formatted(&self) -> String {
        match self {
            Cell::Text(s) => s.replace('|', "\\|"),
            Cell::Count(n) => format_count(*n),
            Cell::Yen(d) => Yen::new(*d).to_string(),
        }
    }

    fn plain(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Count(n) => n.to_string(),
            Cell::Yen(d) => d
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
                .to_string(),
        }
    }

    fn is_figure(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }
}

/// A report table: a header row and rows of cells.
#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub(crate) fn new<S, I>(headers: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// A Markdown table. Figure columns are right-aligned.
    pub(crate) fn markdown(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(Cell::formatted).collect())
            .collect();

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(ix, header)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(ix))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or_default()
                    .max(3)
            })
            .collect();

        let right_aligned: Vec<bool> = (0..self.headers.len())
            .map(|ix| {
                self.rows
                    .first()
                    .and_then(|row| row.get(ix))
                    .is_some_and(Cell::is_figure)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&markdown_line(&self.headers, &widths, &right_aligned));
        let separator: Vec<String> = widths
            .iter()
            .zip(&right_aligned)
            .map(|(&width, &right)| {
                if right {
                    format!("{}:", "-".repeat(width - 1))
                } else {
                    "-".repeat(width)
                }
            })
            .collect();
        out.push_str(&markdown_line(&separator, &widths, &right_aligned));
        for row in &cells {
            out.push_str(&markdown_line(row, &widths, &right_aligned));
        }
        out
    }

    /// CSV with plain figures.
    pub(crate) fn csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .context("Unable to write the CSV header")?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(Cell::plain))
                .context("Unable to write a CSV row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Unable to finish the CSV: {e}"))?;
        String::from_utf8(bytes).context("The CSV output is not valid UTF-8")
    }
}

fn markdown_line(cells: &[String], widths: &[usize], right_aligned: &[bool]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(ix, &width)| {
            let cell = cells.get(ix).map(String::as_str).unwrap_or_default();
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            if right_aligned.get(ix).copied().unwrap_or_default() {
                format!("{pad}{cell}")
            } else {
                format!("{cell}{pad}")
            }
        })
        .collect();
    format!("| {} |\n", padded.join(" | "))
}
