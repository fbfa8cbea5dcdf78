//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without reaching Google.

use crate::api::Source;
use crate::Result;

/// An implementation of the `Source` trait that holds its CSV text in memory and, by default, is
/// seeded with a small export.
pub(crate) struct TestSource {
    csv: String,
}

impl TestSource {
    pub(crate) fn new(csv: impl Into<String>) -> Self {
        Self { csv: csv.into() }
    }
}

impl Default for TestSource {
    /// Loads the seed data from this module.
    fn default() -> Self {
        Self::new(SEED_DATA)
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    fn describe(&self) -> String {
        format!("test data ({} bytes)", self.csv.len())
    }

    async fn fetch_csv(&mut self) -> Result<String> {
        Ok(self.csv.clone())
    }
}

/// Seed export data. Two brands over two months, one row with a bad date and one without a
/// brand prefix.
pub(crate) const SEED_DATA: &str = r##"商品名,商品管理番号,商品番号,平均単価,売上個数,売上,売上件数,受注日
リネンシャツ,kaze1001,4901001,"6,800",3,"20,400",3,2024-01-10
リネンシャツ,kaze1001,4901001,"6,800",2,"13,600",2,2024-02-03
ロゴTシャツ,kaze1003,4901003,"3,200",10,"32,000",8,2024-02-20
木製トレイ,mori2001,4902001,"4,500",4,"18,000",4,2024-01-25
木製トレイ,mori2001,4902001,"4,500",1,"4,500",1,someday
ノベルティ,9001,4909001,0,5,0,5,
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{process_data, process_monthly_data, process_rows};
    use crate::model::BrandNames;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_seed_data_parses() {
        let mut source = TestSource::default();
        let rows = source.rows().await.unwrap();
        assert_eq!(rows.len(), 6);

        let names = BrandNames::builtin();
        let grouped = process_data(&rows, &names);
        assert_eq!(grouped.by_brand["kaze"].units, 15);
        assert_eq!(grouped.by_brand["kaze"].revenue, Decimal::from(66000));
        assert_eq!(grouped.by_brand["mori"].orders, 5);
        assert_eq!(grouped.by_brand["unknown"].units, 5);

        let monthly = process_monthly_data(&process_rows(&rows), &names);
        assert_eq!(monthly.undated_rows, 2);
        assert_eq!(monthly.by_month["2024-02"]["kaze"].units, 12);
    }

    #[tokio::test]
    async fn test_custom_data() {
        let mut source = TestSource::new("商品名,商品管理番号\n");
        assert!(source.rows().await.unwrap().is_empty());
    }
}
