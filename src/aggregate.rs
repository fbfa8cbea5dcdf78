//! Aggregation of sales rows into brand, product and monthly rollups, plus the sort and query
//! helpers that the reports are built from.
//!
//! Nothing in here fails. Bad figures were already turned into zeros when the rows were
//! processed, and rows without a usable order date are only left out of the monthly rollup.

use crate::model::{
    BrandData, BrandNames, BrandUnits, GroupedData, MonthlyData, MonthlyGroupedData, MonthlyPoint,
    ProcessedSalesRow, ProductData, RawSalesRow,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Which figure a brand list is sorted by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BrandSortField {
    Units,
    #[default]
    Revenue,
}

serde_plain::derive_display_from_serialize!(BrandSortField);
serde_plain::derive_fromstr_from_deserialize!(BrandSortField);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

serde_plain::derive_display_from_serialize!(SortDirection);
serde_plain::derive_fromstr_from_deserialize!(SortDirection);

/// Derives codes and parses figures for every row, keeping input order.
pub fn process_rows(rows: &[RawSalesRow]) -> Vec<ProcessedSalesRow> {
    rows.iter()
        .cloned()
        .map(ProcessedSalesRow::from_raw)
        .collect()
}

/// Processes `rows` and rolls them up by brand and by brand and product.
pub fn process_data(rows: &[RawSalesRow], names: &BrandNames) -> GroupedData {
    group_rows(&process_rows(rows), names)
}

/// Rolls already processed rows up by brand and by brand and product, then computes each
/// product's average price.
pub fn group_rows(rows: &[ProcessedSalesRow], names: &BrandNames) -> GroupedData {
    let mut by_brand: BTreeMap<String, BrandData> = BTreeMap::new();
    let mut by_product: BTreeMap<String, BTreeMap<String, ProductData>> = BTreeMap::new();

    for row in rows {
        let brand = by_brand
            .entry(row.brand_code.clone())
            .or_insert_with(|| BrandData::new(&row.brand_code, names.name(&row.brand_code)));
        brand.units = brand.units.saturating_add(row.units);
        brand.revenue = brand.revenue.saturating_add(row.revenue);
        brand.orders = brand.orders.saturating_add(row.orders);

        let product = by_product
            .entry(row.brand_code.clone())
            .or_default()
            .entry(row.product_code.clone())
            .or_insert_with(|| ProductData::new(&row.product_code));
        product.units = product.units.saturating_add(row.units);
        product.revenue = product.revenue.saturating_add(row.revenue);
    }

    for product in by_product.values_mut().flat_map(|p| p.values_mut()) {
        product.average_price = average_price(product.revenue, product.units);
    }

    debug!(
        "Grouped {} rows into {} brands and {} products",
        rows.len(),
        by_brand.len(),
        by_product.values().map(BTreeMap::len).sum::<usize>()
    );

    GroupedData {
        by_brand,
        by_product,
        last_updated: Utc::now(),
    }
}

/// `revenue / units`, or zero when no units were sold.
fn average_price(revenue: Decimal, units: i64) -> Decimal {
    if units > 0 {
        revenue.checked_div(Decimal::from(units)).unwrap_or_default()
    } else {
        Decimal::ZERO
    }
}

/// Rolls rows up by order month (`YYYY-MM`) and brand. Rows without an order date are counted in
/// `undated_rows` and otherwise skipped.
pub fn process_monthly_data(rows: &[ProcessedSalesRow], names: &BrandNames) -> MonthlyGroupedData {
    let mut monthly = MonthlyGroupedData::default();
    for row in rows {
        let Some(month) = row.month_key() else {
            monthly.undated_rows += 1;
            continue;
        };
        let entry = monthly
            .by_month
            .entry(month.clone())
            .or_default()
            .entry(row.brand_code.clone())
            .or_insert_with(|| MonthlyData {
                date: month,
                brand_code: row.brand_code.clone(),
                brand_name: names.name(&row.brand_code),
                units: 0,
                revenue: Decimal::ZERO,
            });
        entry.units = entry.units.saturating_add(row.units);
        entry.revenue = entry.revenue.saturating_add(row.revenue);
    }

    if monthly.undated_rows > 0 {
        debug!(
            "{} of {} rows had no usable order date and were left out of the monthly rollup",
            monthly.undated_rows,
            rows.len()
        );
    }
    monthly
}

/// Sorts brands by revenue, highest first. The sort is stable.
pub fn sort_brands_by_revenue(brands: Vec<BrandData>) -> Vec<BrandData> {
    sort_brands(brands, BrandSortField::Revenue, SortDirection::Desc)
}

/// Sorts products by revenue, highest first. The sort is stable.
pub fn sort_products_by_revenue(mut products: Vec<ProductData>) -> Vec<ProductData> {
    products.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    products
}

/// Sorts brands by `field` in `direction`. The sort is stable.
pub fn sort_brands(
    mut brands: Vec<BrandData>,
    field: BrandSortField,
    direction: SortDirection,
) -> Vec<BrandData> {
    brands.sort_by(|a, b| {
        let ordering = match field {
            BrandSortField::Units => a.units.cmp(&b.units),
            BrandSortField::Revenue => a.revenue.cmp(&b.revenue),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    brands
}

/// All brands, highest revenue first.
pub fn get_all_brands(grouped: &GroupedData) -> Vec<BrandData> {
    sort_brands_by_revenue(grouped.by_brand.values().cloned().collect())
}

/// The products of `brand_code`, highest revenue first. Empty when the brand is not present.
pub fn get_products_for_brand(grouped: &GroupedData, brand_code: &str) -> Vec<ProductData> {
    match grouped.by_product.get(brand_code) {
        Some(products) => sort_products_by_revenue(products.values().cloned().collect()),
        None => Vec::new(),
    }
}

/// The codes of the `n` brands with the highest revenue.
pub fn top_brand_codes(grouped: &GroupedData, n: usize) -> Vec<String> {
    get_all_brands(grouped)
        .into_iter()
        .take(n)
        .map(|b| b.brand_code)
        .collect()
}

/// One point per month, oldest first, carrying the units of each requested brand (zero when the
/// brand sold nothing that month).
pub fn get_monthly_data_for_brands<S>(
    monthly: &MonthlyGroupedData,
    brand_codes: &[S],
) -> Vec<MonthlyPoint>
where
    S: AsRef<str>,
{
    monthly
        .by_month
        .iter()
        .map(|(month, brands)| MonthlyPoint {
            date: month.clone(),
            brands: brand_codes
                .iter()
                .map(|code| {
                    let code = code.as_ref();
                    let data = brands.get(code);
                    BrandUnits {
                        brand_code: code.to_string(),
                        units: data.map(|d| d.units).unwrap_or_default(),
                        brand_name: data.map(|d| d.brand_name.clone()),
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn raw(code: &str, price: &str, units: &str, revenue: &str, orders: &str) -> RawSalesRow {
        RawSalesRow {
            product_name: format!("Product {code}"),
            management_code: code.to_string(),
            product_number: String::new(),
            average_price: price.to_string(),
            units: units.to_string(),
            revenue: revenue.to_string(),
            orders: orders.to_string(),
            order_date: None,
        }
    }

    fn dated(code: &str, units: &str, revenue: &str, date: &str) -> RawSalesRow {
        let mut r = raw(code, "0", units, revenue, "1");
        r.order_date = Some(date.to_string());
        r
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn mixed_rows() -> Vec<RawSalesRow> {
        vec![
            raw("kaze100", "2,500", "4", "10,000", "3"),
            raw("kaze100", "2,500", "2", "5,000", "2"),
            raw("kaze200", "1,200", "10", "12,000", "8"),
            raw("mori7", "800", "5", "4,000", "5"),
            raw("MORI8", "", "0", "1,500", "1"),
            raw("12345", "500", "3", "1,500", "2"),
            raw("sora", "x", "oops", "2,000.50", ""),
        ]
    }

    #[test]
    fn test_end_to_end_single_brand() {
        let rows = vec![
            raw("abc123", "1,000", "2", "2,000", "1"),
            raw("abc456", "1,000", "3", "3,000", "1"),
        ];
        let grouped = process_data(&rows, &BrandNames::builtin());

        let brand = grouped.by_brand.get("abc").unwrap();
        assert_eq!(brand.units, 5);
        assert_eq!(brand.revenue, Decimal::from(5000));
        assert_eq!(brand.orders, 2);
        assert_eq!(brand.brand_name, "unknown (abc)");

        let products = grouped.by_product.get("abc").unwrap();
        assert_eq!(products.len(), 2);
        let p123 = products.get("123").unwrap();
        assert_eq!(p123.units, 2);
        assert_eq!(p123.revenue, Decimal::from(2000));
        assert_eq!(p123.average_price, Decimal::from(1000));
        let p456 = products.get("456").unwrap();
        assert_eq!(p456.units, 3);
        assert_eq!(p456.revenue, Decimal::from(3000));
        assert_eq!(p456.average_price, Decimal::from(1000));
    }

    #[test]
    fn test_brand_totals_equal_product_sums() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        for (code, brand) in &grouped.by_brand {
            let products = grouped.by_product.get(code).unwrap();
            let units: i64 = products.values().map(|p| p.units).sum();
            let revenue: Decimal = products.values().map(|p| p.revenue).sum();
            assert_eq!(units, brand.units, "units for {code}");
            assert_eq!(revenue, brand.revenue, "revenue for {code}");
        }
    }

    #[test]
    fn test_average_price_invariant() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        for product in grouped.by_product.values().flat_map(|p| p.values()) {
            if product.units > 0 {
                assert_eq!(
                    product.average_price,
                    product.revenue / Decimal::from(product.units)
                );
            } else {
                assert_eq!(product.average_price, Decimal::ZERO);
            }
        }
        let kaze100 = &grouped.by_product["kaze"]["100"];
        assert_eq!(kaze100.average_price, Decimal::from(2500));
        let mori8 = &grouped.by_product["mori"]["8"];
        assert_eq!(mori8.units, 0);
        assert_eq!(mori8.average_price, Decimal::ZERO);
    }

    #[test]
    fn test_codes_and_names() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        assert_eq!(
            grouped.by_brand.keys().collect::<Vec<_>>(),
            vec!["kaze", "mori", "sora", "unknown"]
        );
        assert_eq!(grouped.by_brand["kaze"].brand_name, "Kaze Studio");
        assert_eq!(grouped.by_brand["unknown"].brand_name, "unknown (unknown)");
        assert!(grouped.by_product["unknown"].contains_key("12345"));
        assert!(grouped.by_product["sora"].contains_key("unknown"));
    }

    #[test]
    fn test_bad_numbers_count_as_zero() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        let sora = &grouped.by_brand["sora"];
        assert_eq!(sora.units, 0);
        assert_eq!(sora.orders, 0);
        assert_eq!(sora.revenue, dec("2000.50"));
    }

    #[test]
    fn test_huge_totals_saturate() {
        let max_revenue = "79,228,162,514,264,337,593,543,950,335";
        let rows = vec![
            raw("abc1", "1", "9,000,000,000,000,000,000", max_revenue, "9,000,000,000,000,000,000"),
            raw("abc1", "1", "9,000,000,000,000,000,000", max_revenue, "9,000,000,000,000,000,000"),
        ];
        let names = BrandNames::builtin();
        let grouped = process_data(&rows, &names);
        let abc = &grouped.by_brand["abc"];
        assert_eq!(abc.units, i64::MAX);
        assert_eq!(abc.orders, i64::MAX);
        assert_eq!(abc.revenue, Decimal::MAX);
        assert_eq!(grouped.by_product["abc"]["1"].units, i64::MAX);
        assert_eq!(grouped.by_product["abc"]["1"].revenue, Decimal::MAX);

        let dated: Vec<RawSalesRow> = rows
            .into_iter()
            .map(|mut r| {
                r.order_date = Some("2024-03-01".to_string());
                r
            })
            .collect();
        let monthly = process_monthly_data(&process_rows(&dated), &names);
        assert_eq!(monthly.by_month["2024-03"]["abc"].units, i64::MAX);
        assert_eq!(monthly.by_month["2024-03"]["abc"].revenue, Decimal::MAX);
    }

    #[test]
    fn test_empty_input() {
        let grouped = process_data(&[], &BrandNames::builtin());
        assert!(grouped.by_brand.is_empty());
        assert!(grouped.by_product.is_empty());
        assert!(get_all_brands(&grouped).is_empty());
        assert!(top_brand_codes(&grouped, 5).is_empty());
    }

    #[test]
    fn test_rerun_is_independent() {
        let rows = mixed_rows();
        let names = BrandNames::builtin();
        let a = process_data(&rows, &names);
        let b = process_data(&rows, &names);
        assert_eq!(a.by_brand, b.by_brand);
        assert_eq!(a.by_product, b.by_product);
    }

    #[test]
    fn test_sort_brands_by_revenue_non_increasing() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        let brands = get_all_brands(&grouped);
        assert_eq!(brands.len(), 4);
        assert_eq!(brands[0].brand_code, "kaze");
        for pair in brands.windows(2) {
            assert!(pair[0].revenue >= pair[1].revenue);
        }
    }

    #[test]
    fn test_sort_brands_by_revenue_is_stable() {
        let mut a = BrandData::new("a", "A");
        a.revenue = Decimal::from(10);
        let mut b = BrandData::new("b", "B");
        b.revenue = Decimal::from(20);
        let mut c = BrandData::new("c", "C");
        c.revenue = Decimal::from(10);
        let sorted = sort_brands_by_revenue(vec![a, b, c]);
        let codes: Vec<_> = sorted.iter().map(|b| b.brand_code.as_str()).collect();
        assert_eq!(codes, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_brands_by_units_ascending() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        let sorted = sort_brands(
            grouped.by_brand.values().cloned().collect(),
            BrandSortField::Units,
            SortDirection::Asc,
        );
        let units: Vec<i64> = sorted.iter().map(|b| b.units).collect();
        assert_eq!(units, vec![0, 3, 5, 16]);
    }

    #[test]
    fn test_products_for_brand() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        let products = get_products_for_brand(&grouped, "kaze");
        let codes: Vec<_> = products.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["100", "200"]);
        assert_eq!(products[0].revenue, Decimal::from(15000));
        assert!(get_products_for_brand(&grouped, "nope").is_empty());
    }

    #[test]
    fn test_top_brand_codes() {
        let grouped = process_data(&mixed_rows(), &BrandNames::builtin());
        assert_eq!(top_brand_codes(&grouped, 2), vec!["kaze", "mori"]);
        assert_eq!(top_brand_codes(&grouped, 10).len(), 4);
    }

    #[test]
    fn test_monthly_same_brand_same_month_sums() {
        let rows = process_rows(&[
            dated("kaze1", "2", "2,000", "2024-01-03"),
            dated("kaze2", "3", "3,000", "2024-01-28"),
            dated("kaze1", "1", "1,000", "2024-02-01"),
        ]);
        let monthly = process_monthly_data(&rows, &BrandNames::builtin());
        assert_eq!(monthly.by_month.len(), 2);
        let jan = &monthly.by_month["2024-01"]["kaze"];
        assert_eq!(jan.units, 5);
        assert_eq!(jan.revenue, Decimal::from(5000));
        assert_eq!(jan.date, "2024-01");
        assert_eq!(jan.brand_name, "Kaze Studio");
        assert_eq!(monthly.by_month["2024-02"]["kaze"].units, 1);
        assert_eq!(monthly.undated_rows, 0);
    }

    #[test]
    fn test_monthly_skips_and_counts_undated_rows() {
        let raw_rows = vec![
            dated("kaze1", "2", "2,000", "2024-01-03"),
            dated("kaze1", "4", "4,000", "not a date"),
            raw("kaze1", "0", "8", "8,000", "1"),
        ];
        let rows = process_rows(&raw_rows);
        let monthly = process_monthly_data(&rows, &BrandNames::builtin());
        assert_eq!(monthly.undated_rows, 2);
        assert_eq!(monthly.by_month["2024-01"]["kaze"].units, 2);

        // The undated rows still count in the brand rollup.
        let grouped = group_rows(&rows, &BrandNames::builtin());
        assert_eq!(grouped.by_brand["kaze"].units, 14);
    }

    #[test]
    fn test_monthly_data_for_brands() {
        let rows = process_rows(&[
            dated("mori1", "1", "100", "2024-03-10"),
            dated("kaze1", "2", "200", "2024-01-10"),
            dated("mori1", "5", "500", "2024-01-20"),
        ]);
        let monthly = process_monthly_data(&rows, &BrandNames::builtin());
        let points = get_monthly_data_for_brands(&monthly, &["kaze", "mori", "sora"]);

        let dates: Vec<_> = points.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01", "2024-03"]);

        let jan = &points[0];
        assert_eq!(jan.units("kaze"), 2);
        assert_eq!(jan.units("mori"), 5);
        assert_eq!(jan.units("sora"), 0);
        assert_eq!(jan.brands[0].brand_name.as_deref(), Some("Kaze Studio"));
        assert_eq!(jan.brands[2].brand_name, None);

        let mar = &points[1];
        assert_eq!(mar.units("kaze"), 0);
        assert_eq!(mar.brands[0].brand_name, None);
        assert_eq!(mar.units("mori"), 1);
    }

    #[test]
    fn test_monthly_data_for_no_brands() {
        let rows = process_rows(&[dated("kaze1", "2", "200", "2024-01-10")]);
        let monthly = process_monthly_data(&rows, &BrandNames::builtin());
        let points = get_monthly_data_for_brands::<&str>(&monthly, &[]);
        assert_eq!(points.len(), 1);
        assert!(points[0].brands.is_empty());
    }

    #[test]
    fn test_sort_enums_display_and_parse() {
        assert_eq!(BrandSortField::Units.to_string(), "units");
        assert_eq!(
            BrandSortField::from_str("revenue").unwrap(),
            BrandSortField::Revenue
        );
        assert_eq!(SortDirection::Asc.to_string(), "asc");
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }
}
