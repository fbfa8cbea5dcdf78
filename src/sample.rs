//! A built-in sample dataset so that every report can be tried without an export at hand.

use crate::model::RawSalesRow;
use chrono::{Datelike, Months, NaiveDate};

/// (product name, management code, product number, average price, units, revenue, orders)
const SAMPLE: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("リネンシャツ", "kaze1001", "4901001", "6,800", "42", "285,600", "39"),
    ("ワイドパンツ", "kaze1002", "4901002", "7,900", "31", "244,900", "30"),
    ("ロゴTシャツ", "kaze1003", "4901003", "3,200", "88", "281,600", "71"),
    ("木製トレイ", "mori2001", "4902001", "4,500", "25", "112,500", "24"),
    ("カッティングボード", "mori2002", "4902002", "5,800", "19", "110,200", "18"),
    ("コットンキャップ", "sora3001", "4903001", "2,900", "64", "185,600", "60"),
    ("ナイロンバッグ", "sora3002", "4903002", "8,400", "22", "184,800", "22"),
    ("トートバッグ", "sora3003", "4903003", "3,600", "57", "205,200", "49"),
    ("ガラスマグ", "umi4001", "4904001", "2,200", "73", "160,600", "58"),
    ("ウールニット", "yuki5001", "4905001", "12,800", "15", "192,000", "15"),
    ("ウールマフラー", "yuki5002", "4905002", "6,500", "27", "175,500", "26"),
    ("ハンドタオル", "hana6001", "4906001", "1,100", "140", "154,000", "96"),
    ("ギフトセット", "ta7001", "4907001", "9,800", "12", "117,600", "12"),
    ("ノベルティ", "9001", "4909001", "0", "30", "0", "30"),
];

/// The sample rows. They carry no order dates.
pub fn rows() -> Vec<RawSalesRow> {
    SAMPLE
        .iter()
        .map(
            |&(name, code, number, price, units, revenue, orders)| RawSalesRow {
                product_name: name.to_string(),
                management_code: code.to_string(),
                product_number: number.to_string(),
                average_price: price.to_string(),
                units: units.to_string(),
                revenue: revenue.to_string(),
                orders: orders.to_string(),
                order_date: None,
            },
        )
        .collect()
}

/// Dates each row so that the monthly report has something to show: row `i` is dated the 15th of
/// the month `i % 6` months before `today`'s month.
pub fn with_synthetic_dates(rows: Vec<RawSalesRow>, today: NaiveDate) -> Vec<RawSalesRow> {
    let fifteenth = today.with_day(15).unwrap_or(today);
    rows.into_iter()
        .enumerate()
        .map(|(ix, mut row)| {
            let date = fifteenth
                .checked_sub_months(Months::new((ix % 6) as u32))
                .unwrap_or(fifteenth);
            row.order_date = Some(date.format("%Y-%m-%d").to_string());
            row
        })
        .collect()
}
