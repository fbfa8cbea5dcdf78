//! These structs provide the CLI interface for the sales CLI.

use crate::aggregate::{BrandSortField, SortDirection};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// sales: A command-line tool for rolling up exported sales data.
///
/// The purpose of this program is to read a sales export (one row per product with units,
/// revenue and order counts, keyed by a product management code like `kaze1001`) and report it
/// by brand, by product within a brand and by month.
///
/// The export can come from a local CSV file, from a Google Sheet that is shared with anyone
/// who has the link, or from a built-in sample dataset.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// Running this is optional: every report works with --input or --sample without it. It is
    /// needed to remember a Google Sheet URL, or to add brand names in config.json.
    Init(InitArgs),
    /// Show the totals for every brand.
    Brands(BrandsArgs),
    /// Show the totals for every product of one brand.
    Products(ProductsArgs),
    /// Show units per month for a few brands.
    Monthly(MonthlyArgs),
    /// Show the overall totals.
    Summary(SummaryArgs),
    /// Write the built-in sample dataset as CSV.
    Sample(SampleArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/sales
    #[arg(long, env = "SALES_HOME", default_value_t = default_sales_home())]
    sales_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn sales_home(&self) -> &DisplayPath {
        &self.sales_home
    }
}

/// Where the sales rows are read from. With none of these, the sheet URL from config.json is
/// used.
#[derive(Debug, Default, clap::Args, Clone)]
pub struct InputArgs {
    /// Read the export from a local CSV file.
    #[arg(long, conflicts_with_all = ["sheet_url", "sample"])]
    input: Option<PathBuf>,

    /// Read the export from a Google Sheet. The sheet must be viewable by anyone with the link.
    /// It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX/edit#gid=0
    ///
    /// When it is read successfully, it is saved to config.json as the default sheet.
    #[arg(long, conflicts_with = "sample")]
    sheet_url: Option<String>,

    /// Use the built-in sample dataset, dated over the last six months.
    #[arg(long)]
    sample: bool,
}

impl InputArgs {
    pub fn new(input: Option<PathBuf>, sheet_url: Option<String>, sample: bool) -> Self {
        Self {
            input,
            sheet_url,
            sample,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Some(path.into()), None, false)
    }

    pub fn sheet(sheet_url: impl Into<String>) -> Self {
        Self::new(None, Some(sheet_url.into()), false)
    }

    pub fn sample_data() -> Self {
        Self::new(None, None, true)
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn sheet_url(&self) -> Option<&str> {
        self.sheet_url.as_deref()
    }

    pub fn sample(&self) -> bool {
        self.sample
    }
}

/// How report rows are printed to stdout.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A Markdown table with formatted figures.
    #[default]
    Table,
    /// CSV with plain figures.
    Csv,
    /// Pretty-printed JSON.
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// (Not shown): Args for the `sales init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to the Google Sheet that holds the sales export. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX/edit#gid=0
    #[arg(long)]
    sheet_url: Option<String>,
}

impl InitArgs {
    pub fn sheet_url(&self) -> Option<&str> {
        self.sheet_url.as_deref()
    }
}

/// (Not shown): Args for the `sales brands` command.
#[derive(Debug, Parser, Clone)]
pub struct BrandsArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// The figure to sort by.
    #[arg(long, default_value_t = BrandSortField::Revenue)]
    sort: BrandSortField,

    /// The sort direction.
    #[arg(long, default_value_t = SortDirection::Desc)]
    order: SortDirection,

    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl BrandsArgs {
    pub fn new(
        input: InputArgs,
        sort: BrandSortField,
        order: SortDirection,
        format: OutputFormat,
    ) -> Self {
        Self {
            input,
            sort,
            order,
            format,
        }
    }

    pub fn input(&self) -> &InputArgs {
        &self.input
    }

    pub fn sort(&self) -> BrandSortField {
        self.sort
    }

    pub fn order(&self) -> SortDirection {
        self.order
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `sales products` command.
#[derive(Debug, Parser, Clone)]
pub struct ProductsArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// The brand code, e.g. `kaze`. Defaults to the brand with the highest revenue.
    #[arg(long)]
    brand: Option<String>,

    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ProductsArgs {
    pub fn new(input: InputArgs, brand: Option<String>, format: OutputFormat) -> Self {
        Self {
            input,
            brand,
            format,
        }
    }

    pub fn input(&self) -> &InputArgs {
        &self.input
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `sales monthly` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthlyArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Comma-separated brand codes, e.g. `kaze,mori`. Defaults to the five brands with the
    /// highest revenue.
    #[arg(long, value_delimiter = ',')]
    brands: Vec<String>,

    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl MonthlyArgs {
    pub fn new(input: InputArgs, brands: Vec<String>, format: OutputFormat) -> Self {
        Self {
            input,
            brands,
            format,
        }
    }

    pub fn input(&self) -> &InputArgs {
        &self.input
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `sales summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    input: InputArgs,

    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl SummaryArgs {
    pub fn new(input: InputArgs, format: OutputFormat) -> Self {
        Self { input, format }
    }

    pub fn input(&self) -> &InputArgs {
        &self.input
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `sales sample` command.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Where to write the CSV. Printed to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl SampleArgs {
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

fn default_sales_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("sales"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --sales-home or SALES_HOME instead of relying on the default \
                sales home directory.",
            );
            PathBuf::from("sales")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["sales", "--sales-home", "/tmp/sales-home"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_brands_defaults() {
        let args = parse(&["brands", "--sample"]);
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        assert_eq!(
            args.common().sales_home().path(),
            Path::new("/tmp/sales-home")
        );
        let Command::Brands(brands) = args.command() else {
            panic!("expected the brands command");
        };
        assert!(brands.input().sample());
        assert_eq!(brands.sort(), BrandSortField::Revenue);
        assert_eq!(brands.order(), SortDirection::Desc);
        assert_eq!(brands.format(), OutputFormat::Table);
    }

    #[test]
    fn test_brands_sort_options() {
        let args = parse(&[
            "brands", "--input", "x.csv", "--sort", "units", "--order", "asc", "--format", "csv",
        ]);
        let Command::Brands(brands) = args.command() else {
            panic!("expected the brands command");
        };
        assert_eq!(brands.input().input(), Some(Path::new("x.csv")));
        assert_eq!(brands.sort(), BrandSortField::Units);
        assert_eq!(brands.order(), SortDirection::Asc);
        assert_eq!(brands.format(), OutputFormat::Csv);
    }

    #[test]
    fn test_monthly_brand_list() {
        let args = parse(&["monthly", "--brands", "kaze,mori", "--format", "json"]);
        let Command::Monthly(monthly) = args.command() else {
            panic!("expected the monthly command");
        };
        assert_eq!(monthly.brands(), ["kaze", "mori"]);
        assert_eq!(monthly.format(), OutputFormat::Json);
    }

    #[test]
    fn test_input_options_conflict() {
        let result = Args::try_parse_from([
            "sales",
            "summary",
            "--input",
            "x.csv",
            "--sample",
        ]);
        assert!(result.is_err());

        let result = Args::try_parse_from([
            "sales",
            "summary",
            "--sheet-url",
            "https://docs.google.com/spreadsheets/d/A",
            "--input",
            "x.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_plain() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::from_str("csv").unwrap(), OutputFormat::Csv);
    }
}
