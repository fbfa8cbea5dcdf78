//! The aggregated views: per brand, per brand and product, and per month and brand.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

const DATE_KEY: &str = "date";

/// Totals for one brand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BrandData {
    pub brand_code: String,
    pub brand_name: String,
    pub units: i64,
    pub revenue: Decimal,
    pub orders: i64,
}

impl BrandData {
    pub(crate) fn new(brand_code: impl Into<String>, brand_name: impl Into<String>) -> Self {
        Self {
            brand_code: brand_code.into(),
            brand_name: brand_name.into(),
            units: 0,
            revenue: Decimal::ZERO,
            orders: 0,
        }
    }
}

/// Totals for one product within a brand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductData {
    pub product_code: String,
    pub units: i64,
    pub revenue: Decimal,
    /// `revenue / units`, or zero when no units were sold.
    pub average_price: Decimal,
}

impl ProductData {
    pub(crate) fn new(product_code: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            units: 0,
            revenue: Decimal::ZERO,
            average_price: Decimal::ZERO,
        }
    }
}

/// The brand and product rollups from one aggregation run.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupedData {
    /// brand code -> totals
    pub by_brand: BTreeMap<String, BrandData>,
    /// brand code -> product code -> totals
    pub by_product: BTreeMap<String, BTreeMap<String, ProductData>>,
    pub last_updated: DateTime<Utc>,
}

/// Totals for one brand in one month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyData {
    /// `YYYY-MM`
    pub date: String,
    pub brand_code: String,
    pub brand_name: String,
    pub units: i64,
    pub revenue: Decimal,
}

/// The monthly rollup from one aggregation run.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyGroupedData {
    /// `YYYY-MM` -> brand code -> totals
    pub by_month: BTreeMap<String, BTreeMap<String, MonthlyData>>,
    /// Rows left out because they had no usable order date.
    pub undated_rows: usize,
}

/// One brand's units in a `MonthlyPoint`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BrandUnits {
    pub brand_code: String,
    pub units: i64,
    /// Present only when the brand has data in the month.
    pub brand_name: Option<String>,
}

/// Units per requested brand for one month, the shape a trend chart consumes.
///
/// Serializes flat, keyed by brand code, e.g.
/// `{"date": "2024-01", "kaze": 12, "kaze_name": "Kaze Studio", "mori": 0}`.
/// A brand code of `date` and repeated codes are left out so that every key is written once.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthlyPoint {
    pub date: String,
    pub brands: Vec<BrandUnits>,
}

impl MonthlyPoint {
    /// The units for `brand_code`, zero when it was not requested.
    pub fn units(&self, brand_code: &str) -> i64 {
        self.brands
            .iter()
            .find(|b| b.brand_code == brand_code)
            .map(|b| b.units)
            .unwrap_or_default()
    }
}

impl Serialize for MonthlyPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(DATE_KEY, &self.date)?;
        let mut written = BTreeSet::new();
        for brand in &self.brands {
            if brand.brand_code == DATE_KEY || !written.insert(brand.brand_code.as_str()) {
                continue;
            }
            map.serialize_entry(&brand.brand_code, &brand.units)?;
            if let Some(name) = &brand.brand_name {
                map.serialize_entry(&format!("{}_name", brand.brand_code), name)?;
            }
        }
        map.end()
    }
}
