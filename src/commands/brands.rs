use crate::aggregate::{get_all_brands, process_data, sort_brands};
use crate::api::Mode;
use crate::args::BrandsArgs;
use crate::commands::load::load;
use crate::commands::rows::{Cell, Rows, Table};
use crate::commands::Out;
use crate::model::BrandData;
use crate::{Config, Result};

/// The brand table: units, revenue and orders per brand, sorted as requested.
pub async fn brands(mut config: Config, mode: Mode, args: BrandsArgs) -> Result<Out<Rows>> {
    let dataset = load(&mut config, args.input(), mode).await?;
    let grouped = process_data(&dataset.rows, &config.brand_names());
    let brands = sort_brands(get_all_brands(&grouped), args.sort(), args.order());

    let table = brands_table(&brands);
    let message = format!(
        "{} brands in {} rows from {}, sorted by {} {}",
        brands.len(),
        dataset.rows.len(),
        dataset.origin,
        args.sort(),
        args.order()
    );
    Ok(Out::new(
        message,
        Rows::render(args.format(), &table, &brands)?,
    ))
}

fn brands_table(brands: &[BrandData]) -> Table {
    let mut table = Table::new(["Code", "Brand", "Units", "Revenue", "Orders"]);
    for brand in brands {
        table.push(vec![
            Cell::text(&brand.brand_code),
            Cell::text(&brand.brand_name),
            Cell::Count(brand.units),
            Cell::Yen(brand.revenue),
            Cell::Count(brand.orders),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{BrandSortField, SortDirection};
    use crate::args::{InputArgs, OutputFormat};
    use crate::test::TestEnv;

    fn args(sort: BrandSortField, order: SortDirection, format: OutputFormat) -> BrandsArgs {
        BrandsArgs::new(InputArgs::default(), sort, order, format)
    }

    #[tokio::test]
    async fn test_brands_json() {
        let env = TestEnv::new().await;
        let out = brands(
            env.config(),
            Mode::Test,
            args(
                BrandSortField::Revenue,
                SortDirection::Desc,
                OutputFormat::Json,
            ),
        )
        .await
        .unwrap();
        assert!(out.message().starts_with("3 brands in 6 rows"));
        let Some(Rows::Json(json)) = out.structure() else {
            panic!("expected JSON rows");
        };
        let codes: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["brand_code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, ["kaze", "mori", "unknown"]);
        assert_eq!(json[0]["units"], 15);
        assert_eq!(json[0]["revenue"], 66000.0);
        assert_eq!(json[0]["brand_name"], "Kaze Studio");
        assert_eq!(json[2]["brand_name"], "unknown (unknown)");
    }

    #[tokio::test]
    async fn test_brands_by_units_ascending_csv() {
        let env = TestEnv::new().await;
        let out = brands(
            env.config(),
            Mode::Test,
            args(BrandSortField::Units, SortDirection::Asc, OutputFormat::Csv),
        )
        .await
        .unwrap();
        let Some(Rows::Csv(csv)) = out.structure() else {
            panic!("expected CSV rows");
        };
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Code,Brand,Units,Revenue,Orders");
        // mori and unknown both sold 5 units; mori has more revenue so it stays first.
        assert!(lines[1].starts_with("mori,"));
        assert!(lines[2].starts_with("unknown,"));
        assert_eq!(lines[3], "kaze,Kaze Studio,15,66000,13");
    }

    #[tokio::test]
    async fn test_brands_table_from_sample() {
        let env = TestEnv::new().await;
        let out = brands(
            env.config(),
            Mode::Test,
            BrandsArgs::new(
                InputArgs::sample_data(),
                BrandSortField::Revenue,
                SortDirection::Desc,
                OutputFormat::Table,
            ),
        )
        .await
        .unwrap();
        let rendered = out.structure().unwrap().to_string();
        let first_row = rendered.lines().nth(2).unwrap();
        assert!(first_row.contains("Kaze Studio"));
        assert!(first_row.contains("￥812,100"));
    }
}
