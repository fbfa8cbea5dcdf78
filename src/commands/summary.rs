use crate::aggregate::{group_rows, process_monthly_data, process_rows};
use crate::api::Mode;
use crate::args::SummaryArgs;
use crate::commands::load::load;
use crate::commands::rows::{Cell, Rows, Table};
use crate::commands::Out;
use crate::{Config, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// The headline figures of one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub source: String,
    pub rows: usize,
    pub brands: usize,
    pub products: usize,
    pub months: usize,
    pub units: i64,
    pub revenue: Decimal,
    pub orders: i64,
    /// Rows left out of the monthly report because they had no usable order date.
    pub undated_rows: usize,
    pub last_updated: DateTime<Utc>,
}

/// Totals across all brands, plus counts of what was found.
pub async fn summary(mut config: Config, mode: Mode, args: SummaryArgs) -> Result<Out<Rows>> {
    let dataset = load(&mut config, args.input(), mode).await?;
    let names = config.brand_names();
    let processed = process_rows(&dataset.rows);
    let grouped = group_rows(&processed, &names);
    let monthly = process_monthly_data(&processed, &names);

    let summary = Summary {
        source: dataset.origin,
        rows: dataset.rows.len(),
        brands: grouped.by_brand.len(),
        products: grouped.by_product.values().map(|p| p.len()).sum(),
        months: monthly.by_month.len(),
        units: grouped
            .by_brand
            .values()
            .fold(0i64, |total, b| total.saturating_add(b.units)),
        revenue: grouped
            .by_brand
            .values()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.revenue)),
        orders: grouped
            .by_brand
            .values()
            .fold(0i64, |total, b| total.saturating_add(b.orders)),
        undated_rows: monthly.undated_rows,
        last_updated: grouped.last_updated,
    };

    let mut table = Table::new(["Metric", "Value"]);
    table.push(vec![Cell::text("Source"), Cell::text(&summary.source)]);
    table.push(vec![Cell::text("Rows"), Cell::Count(count(summary.rows))]);
    table.push(vec![Cell::text("Brands"), Cell::Count(count(summary.brands))]);
    table.push(vec![
        Cell::text("Products"),
        Cell::Count(count(summary.products)),
    ]);
    table.push(vec![Cell::text("Months"), Cell::Count(count(summary.months))]);
    table.push(vec![Cell::text("Units"), Cell::Count(summary.units)]);
    table.push(vec![Cell::text("Revenue"), Cell::Yen(summary.revenue)]);
    table.push(vec![Cell::text("Orders"), Cell::Count(summary.orders)]);
    table.push(vec![
        Cell::text("Undated rows"),
        Cell::Count(count(summary.undated_rows)),
    ]);
    table.push(vec![
        Cell::text("Last updated"),
        Cell::text(summary.last_updated.to_rfc3339()),
    ]);

    let message = format!(
        "Summarized {} rows from {}",
        summary.rows, summary.source
    );
    Ok(Out::new(
        message,
        Rows::render(args.format(), &table, &summary)?,
    ))
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
