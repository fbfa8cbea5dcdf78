//! Types that represent the sales data model, from the raw exported rows to the brand, product and
//! monthly rollups.
mod brand_names;
mod codes;
mod number;
mod rollup;
mod row;

pub use brand_names::{unknown_name, BrandNames};
pub use codes::{extract_brand_code, extract_product_code, UNKNOWN};
pub use number::{format_count, parse_count, parse_decimal, Yen};
pub use rollup::{
    BrandData, BrandUnits, GroupedData, MonthlyData, MonthlyGroupedData, MonthlyPoint, ProductData,
};
pub use row::{month_key, parse_csv, parse_order_date, write_csv, ProcessedSalesRow, RawSalesRow};
