use crate::aggregate::{get_products_for_brand, process_data, top_brand_codes};
use crate::api::Mode;
use crate::args::ProductsArgs;
use crate::commands::load::load;
use crate::commands::rows::{Cell, Rows, Table};
use crate::commands::Out;
use crate::model::ProductData;
use crate::{Config, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// The product drill-down for one brand.
#[derive(Debug, Clone, Serialize)]
pub struct ProductsReport {
    pub brand_code: String,
    pub brand_name: String,
    pub products: Vec<ProductData>,
}

/// The products of one brand, highest revenue first. Without `--brand` the brand with the
/// highest revenue is shown.
pub async fn products(mut config: Config, mode: Mode, args: ProductsArgs) -> Result<Out<Rows>> {
    let dataset = load(&mut config, args.input(), mode).await?;
    let names = config.brand_names();
    let grouped = process_data(&dataset.rows, &names);

    let brand_code = match args.brand() {
        Some(code) => code.trim().to_ascii_lowercase(),
        None => match top_brand_codes(&grouped, 1).into_iter().next() {
            Some(code) => {
                debug!("No brand given, using the top brand '{code}'");
                code
            }
            None => {
                let table = products_table(&[]);
                return Ok(Out::new(
                    format!("There are no sales rows in {}", dataset.origin),
                    Rows::render(args.format(), &table, &Vec::<ProductData>::new())?,
                ));
            }
        },
    };

    let products = get_products_for_brand(&grouped, &brand_code);
    if products.is_empty() {
        warn!("The brand '{brand_code}' has no products in {}", dataset.origin);
    }
    let brand_name = grouped
        .by_brand
        .get(&brand_code)
        .map(|b| b.brand_name.clone())
        .unwrap_or_else(|| names.name(&brand_code));

    let table = products_table(&products);
    let message = format!(
        "{} products for {brand_name} ({brand_code}) from {}",
        products.len(),
        dataset.origin
    );
    let report = ProductsReport {
        brand_code,
        brand_name,
        products,
    };
    Ok(Out::new(
        message,
        Rows::render(args.format(), &table, &report)?,
    ))
}

fn products_table(products: &[ProductData]) -> Table {
    let mut table = Table::new(["Product", "Units", "Revenue", "Average price"]);
    for product in products {
        table.push(vec![
            Cell::text(&product.product_code),
            Cell::Count(product.units),
            Cell::Yen(product.revenue),
            Cell::Yen(product.average_price),
        ]);
    }
    table
}
