use crate::aggregate::{
    get_monthly_data_for_brands, group_rows, process_monthly_data, process_rows, top_brand_codes,
};
use crate::api::Mode;
use crate::args::MonthlyArgs;
use crate::commands::load::load;
use crate::commands::rows::{Cell, Rows, Table};
use crate::commands::Out;
use crate::model::MonthlyPoint;
use crate::{Config, Result};
use tracing::debug;

/// How many brands the monthly report shows when none are requested.
const DEFAULT_BRAND_COUNT: usize = 5;

/// Units per month for the requested brands, oldest month first. Without `--brands` the five
/// brands with the highest revenue are shown.
pub async fn monthly(mut config: Config, mode: Mode, args: MonthlyArgs) -> Result<Out<Rows>> {
    let dataset = load(&mut config, args.input(), mode).await?;
    let names = config.brand_names();
    let processed = process_rows(&dataset.rows);
    let monthly = process_monthly_data(&processed, &names);

    let mut brand_codes: Vec<String> = Vec::new();
    for code in args.brands() {
        let code = code.trim().to_ascii_lowercase();
        if !code.is_empty() && !brand_codes.contains(&code) {
            brand_codes.push(code);
        }
    }
    if brand_codes.is_empty() {
        brand_codes = top_brand_codes(&group_rows(&processed, &names), DEFAULT_BRAND_COUNT);
        debug!("No brands given, using the top brands {brand_codes:?}");
    }

    let points = get_monthly_data_for_brands(&monthly, &brand_codes);
    let table = monthly_table(&brand_codes, &points);

    let mut message = format!(
        "{} months for {} from {}",
        points.len(),
        if brand_codes.is_empty() {
            "no brands".to_string()
        } else {
            brand_codes.join(", ")
        },
        dataset.origin
    );
    if monthly.undated_rows > 0 {
        message.push_str(&format!(
            "; {} rows without a usable order date were left out",
            monthly.undated_rows
        ));
    }
    Ok(Out::new(
        message,
        Rows::render(args.format(), &table, &points)?,
    ))
}

fn monthly_table(brand_codes: &[String], points: &[MonthlyPoint]) -> Table {
    let headers = std::iter::once("Month".to_string()).chain(brand_codes.iter().cloned());
    let mut table = Table::new(headers);
    for point in points {
        let mut row = vec![Cell::text(&point.date)];
        row.extend(point.brands.iter().map(|b| Cell::Count(b.units)));
        table.push(row);
    }
    table
}
