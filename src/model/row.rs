use crate::model::codes::{extract_brand_code, extract_product_code};
use crate::model::number::{parse_count, parse_decimal};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub(crate) const PRODUCT_NAME_STR: &str = "商品名";
pub(crate) const MANAGEMENT_CODE_STR: &str = "商品管理番号";
pub(crate) const PRODUCT_NUMBER_STR: &str = "商品番号";
pub(crate) const AVERAGE_PRICE_STR: &str = "平均単価";
pub(crate) const UNITS_STR: &str = "売上個数";
pub(crate) const REVENUE_STR: &str = "売上";
pub(crate) const ORDERS_STR: &str = "売上件数";
pub(crate) const ORDER_DATE_STR: &str = "受注日";

/// One row of the exported sales sheet, exactly as the export wrote it.
///
/// All fields are text. Numeric fields carry comma thousands separators, e.g. `"1,234"`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRow {
    #[serde(rename = "商品名")]
    pub product_name: String,
    /// The product management code: a brand prefix followed by a number, e.g. `abc123`.
    #[serde(rename = "商品管理番号")]
    pub management_code: String,
    #[serde(rename = "商品番号")]
    pub product_number: String,
    #[serde(rename = "平均単価")]
    pub average_price: String,
    #[serde(rename = "売上個数")]
    pub units: String,
    #[serde(rename = "売上")]
    pub revenue: String,
    #[serde(rename = "売上件数")]
    pub orders: String,
    #[serde(rename = "受注日", default)]
    pub order_date: Option<String>,
}

/// A `RawSalesRow` with its codes derived and its figures parsed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ProcessedSalesRow {
    #[serde(flatten)]
    pub raw: RawSalesRow,
    pub brand_code: String,
    pub product_code: String,
    pub average_price: Decimal,
    pub units: i64,
    pub revenue: Decimal,
    pub orders: i64,
    pub order_date: Option<NaiveDate>,
}

impl ProcessedSalesRow {
    /// Derives codes and parses figures. Never fails: bad numbers become zero and a bad date
    /// becomes `None`.
    pub fn from_raw(raw: RawSalesRow) -> Self {
        let order_date = raw.order_date.as_deref().and_then(parse_order_date);
        Self {
            brand_code: extract_brand_code(&raw.management_code),
            product_code: extract_product_code(&raw.management_code),
            average_price: parse_decimal(&raw.average_price),
            units: parse_count(&raw.units),
            revenue: parse_decimal(&raw.revenue),
            orders: parse_count(&raw.orders),
            order_date,
            raw,
        }
    }

    /// The `YYYY-MM` key of the order date, if there is one.
    pub fn month_key(&self) -> Option<String> {
        self.order_date.map(|d| month_key(&d))
    }
}

/// Formats `date` as a `YYYY-MM` month key.
pub fn month_key(date: &NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y年%m月%d日"];

/// Parses an order date. Timestamps with an offset are converted to UTC before the date is
/// taken. Returns `None` for empty or unrecognized input.
pub fn parse_order_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

/// Parses CSV text with a header row into rows. Columns may appear in any order, unknown columns
/// are ignored and the order date column is optional. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<RawSalesRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for (ix, result) in rdr.deserialize().enumerate() {
        // ix + 2 because the header is line 1
        let row: RawSalesRow =
            result.with_context(|| format!("Unable to parse the sales CSV at row {}", ix + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Writes rows as CSV text, header included.
pub fn write_csv(rows: &[RawSalesRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        wtr.write_record([
            PRODUCT_NAME_STR,
            MANAGEMENT_CODE_STR,
            PRODUCT_NUMBER_STR,
            AVERAGE_PRICE_STR,
            UNITS_STR,
            REVENUE_STR,
            ORDERS_STR,
            ORDER_DATE_STR,
        ])?;
    }
    for row in rows {
        wtr.serialize(row).context("Unable to serialize a sales row to CSV")?;
    }
    let bytes = wtr
        .into_inner()
        .context("Unable to flush the CSV writer")?;
    String::from_utf8(bytes).context("The CSV writer produced invalid UTF-8")
}
