//! Sales aggregation.
//!
//! Group-and-sum helpers that turn a record set into `AggregateRow`s keyed
//! by category, sub-category or calendar month.

use crate::models::{AggregateRow, Month, SalesRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Sum sales and profit per category, ordered by category name.
pub fn by_category<'a, I>(records: I) -> Vec<AggregateRow<String>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    group_by(records, |r| r.category.clone())
}

/// Sum sales and profit per sub-category, ordered by sub-category name.
pub fn by_sub_category<'a, I>(records: I) -> Vec<AggregateRow<String>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    group_by(records, |r| r.sub_category.clone())
}

/// Sum sales and profit per calendar month, in chronological order.
///
/// Every month between the first and last order is present; months without
/// orders carry zero sums.
pub fn by_month<'a, I>(records: I) -> Vec<AggregateRow<Month>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let observed: BTreeMap<Month, AggregateRow<Month>> = group_by(records, SalesRecord::month)
        .into_iter()
        .map(|row| (row.key, row))
        .collect();

    let (Some(&first), Some(&last)) = (observed.keys().next(), observed.keys().next_back()) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let mut month = first;
    while month <= last {
        rows.push(
            observed
                .get(&month)
                .cloned()
                .unwrap_or_else(|| AggregateRow::empty(month)),
        );
        month = month.succ();
    }

    rows
}

/// Total sales and profit over a record set, saturating at the decimal range.
pub fn totals<'a, I>(records: I) -> (Decimal, Decimal)
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(sales, profit), r| {
            (sales.saturating_add(r.sales), profit.saturating_add(r.profit))
        })
}

fn group_by<'a, I, K, F>(records: I, key: F) -> Vec<AggregateRow<K>>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Ord + Clone,
    F: Fn(&SalesRecord) -> K,
{
    let mut grouped: BTreeMap<K, AggregateRow<K>> = BTreeMap::new();

    for record in records {
        let k = key(record);
        grouped
            .entry(k.clone())
            .or_insert_with(|| AggregateRow::empty(k))
            .add(record);
    }

    grouped.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn create_test_record(
        date: (i32, u32, u32),
        category: &str,
        sub_category: &str,
        sales: Decimal,
        profit: Decimal,
    ) -> SalesRecord {
        SalesRecord {
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sales,
            profit,
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            create_test_record((2016, 11, 8), "Technology", "Phones", dec!(907.152), dec!(90.7152)),
            create_test_record((2016, 11, 20), "Furniture", "Chairs", dec!(100), dec!(20)),
            create_test_record((2017, 2, 1), "Furniture", "Tables", dec!(50), dec!(-10)),
            create_test_record((2017, 2, 3), "Office Supplies", "Art", dec!(7.28), dec!(1.9656)),
        ]
    }

    #[test]
    fn test_by_category() {
        let rows = by_category(&sample());

        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Furniture", "Office Supplies", "Technology"]);

        assert_eq!(rows[0].sales, dec!(150));
        assert_eq!(rows[0].profit, dec!(10));
        assert_eq!(rows[0].orders, 2);
    }

    #[test]
    fn test_category_sales_sum_to_total() {
        let records = sample();
        let rows = by_category(&records);
        let (total_sales, total_profit) = totals(&records);

        assert_eq!(rows.iter().map(|r| r.sales).sum::<Decimal>(), total_sales);
        assert_eq!(rows.iter().map(|r| r.profit).sum::<Decimal>(), total_profit);
    }

    #[test]
    fn test_by_sub_category() {
        let records = sample();
        let furniture: Vec<_> = records.iter().filter(|r| r.category == "Furniture").collect();
        let rows = by_sub_category(furniture);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "Chairs");
        assert_eq!(rows[1].key, "Tables");
        assert_eq!(rows[1].profit, dec!(-10));
    }

    #[test]
    fn test_by_month_is_chronological_with_gaps_filled() {
        let rows = by_month(&sample());

        let keys: Vec<_> = rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["2016-11", "2016-12", "2017-01", "2017-02"]);

        assert_eq!(rows[0].sales, dec!(1007.152));
        assert_eq!(rows[1].sales, Decimal::ZERO);
        assert_eq!(rows[1].orders, 0);
        assert_eq!(rows[3].profit, dec!(-8.0344));
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<SalesRecord> = Vec::new();
        assert!(by_category(&empty).is_empty());
        assert!(by_month(&empty).is_empty());
        assert_eq!(totals(&empty), (Decimal::ZERO, Decimal::ZERO));
    }
}
