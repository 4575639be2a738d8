//! Aggregation
//!
//! One pass over the rows fills fresh accumulators; the derived outputs are
//! computed afterwards. Bad data never fails the run: unparseable numbers are
//! zero, missing labels fall back to "Unknown"/"Other", and unrecognised
//! dates are grouped under their raw text.

use std::borrow::Cow;
use std::cmp::Ordering;

use indexmap::IndexMap;

use super::cell::{day_key, Row};
use super::columns::{resolve_columns, ColumnMap, Role};
use super::snapshot::{
    BestItem, DailyBreakdown, DayTotals, ItemQuantity, Snapshot, DAILY_TOP_ITEMS,
    DISTRIBUTION_SLOTS, OTHERS_LABEL, OTHER_CATEGORY, SERIES_DAYS, UNKNOWN_ITEM,
};

/// Per-key running totals in first-seen order
#[derive(Debug, Default)]
struct Tally(IndexMap<String, f64>);

impl Tally {
    fn add(&mut self, key: &str, amount: f64) {
        match self.0.get_mut(key) {
            Some(total) => *total += amount,
            None => {
                self.0.insert(key.to_string(), amount);
            }
        }
    }

    /// Running maximum with strict `>`: an equal later entry never displaces
    /// the current best.
    fn best(&self) -> BestItem {
        let mut best = BestItem::default();
        for (name, quantity) in &self.0 {
            if *quantity > best.quantity {
                best.name = name.clone();
                best.quantity = *quantity;
            }
        }
        best
    }

    /// Entries sorted by quantity, largest first; ties keep first-seen order
    fn ranked(&self) -> Vec<ItemQuantity> {
        let mut ranked: Vec<ItemQuantity> = self
            .0
            .iter()
            .map(|(name, quantity)| ItemQuantity::new(name.clone(), *quantity))
            .collect();
        ranked.sort_by(|a, b| {
            b.quantity
                .partial_cmp(&a.quantity)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }
}

#[derive(Debug, Default)]
struct DayTally {
    quantity: f64,
    revenue: f64,
    items: Tally,
}

/// Resolve the columns and aggregate in one call.
///
/// Returns `None` when there are no rows.
pub fn analyze<S: AsRef<str>>(columns: &[S], rows: &[Row]) -> Option<Snapshot> {
    aggregate(rows, &resolve_columns(columns))
}

/// Aggregate rows whose columns are already resolved.
///
/// Returns `None` ("no snapshot available") for an empty row list; every
/// other input produces a snapshot.
pub fn aggregate(rows: &[Row], columns: &ColumnMap) -> Option<Snapshot> {
    if rows.is_empty() {
        return None;
    }

    let date_col = columns.get(Role::Date);
    let item_col = columns.get(Role::Item);
    let quantity_col = columns.get(Role::Quantity);
    let revenue_col = columns.get(Role::Revenue);
    let category_col = columns.get(Role::Category);

    let mut total_revenue = 0.0;
    let mut total_quantity = 0.0;
    let mut by_item = Tally::default();
    let mut by_category = Tally::default();
    let mut by_day: IndexMap<String, DayTally> = IndexMap::new();

    for row in rows {
        // Without a quantity column every row counts as one unit sold
        let quantity = quantity_col.map_or(1.0, |col| row.get(col).as_number());
        let revenue = revenue_col.map_or(0.0, |col| row.get(col).as_number());
        let item = item_col
            .and_then(|col| row.get(col).label())
            .unwrap_or(Cow::Borrowed(UNKNOWN_ITEM));
        let category = category_col
            .and_then(|col| row.get(col).label())
            .unwrap_or(Cow::Borrowed(OTHER_CATEGORY));

        total_revenue += revenue;
        total_quantity += quantity;
        by_item.add(&item, quantity);
        by_category.add(&category, quantity);

        if let Some(key) = date_col.and_then(|col| day_key(row.get(col))) {
            let day = by_day.entry(key).or_default();
            day.quantity += quantity;
            day.revenue += revenue;
            day.items.add(&item, quantity);
        }
    }

    let best_item = by_item.best();
    let day_count = by_day.len();
    let daily_average_revenue = total_revenue / day_count.max(1) as f64;

    let item_distribution = with_others_bucket(by_item.ranked(), DISTRIBUTION_SLOTS);
    let category_distribution = by_category.ranked();

    // ISO keys sort chronologically as plain strings
    let mut days: Vec<&String> = by_day.keys().collect();
    days.sort();

    let daily_series = days[days.len().saturating_sub(SERIES_DAYS)..]
        .iter()
        .map(|key| {
            let day = &by_day[*key];
            DayTotals {
                day: (*key).clone(),
                quantity: day.quantity,
                revenue: day.revenue,
            }
        })
        .collect();

    let daily_breakdowns = days
        .iter()
        .rev()
        .map(|key| {
            let day = &by_day[*key];
            let mut top_items = day.items.ranked();
            top_items.truncate(DAILY_TOP_ITEMS);
            DailyBreakdown {
                day: (*key).clone(),
                revenue: day.revenue,
                items_sold: day.quantity,
                top_items,
            }
        })
        .collect();

    tracing::debug!(
        rows = rows.len(),
        items = by_item.0.len(),
        days = day_count,
        "Aggregated sales rows"
    );

    Some(Snapshot {
        total_revenue,
        total_quantity,
        best_item,
        daily_average_revenue,
        day_count,
        item_distribution,
        category_distribution,
        daily_series,
        daily_breakdowns,
    })
}

/// Keep the first `slots` entries and fold the rest into "Others" when the
/// remainder is positive.
fn with_others_bucket(mut ranked: Vec<ItemQuantity>, slots: usize) -> Vec<ItemQuantity> {
    if ranked.len() <= slots {
        return ranked;
    }

    let rest: f64 = ranked.drain(slots..).map(|i| i.quantity).sum();
    if rest > 0.0 {
        ranked.push(ItemQuantity::new(OTHERS_LABEL, rest));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::cell::CellValue;
    use crate::analytics::snapshot::BEST_ITEM_PLACEHOLDER;

    fn sale(date: &str, item: &str, qty: f64, revenue: &str) -> Row {
        Row::new()
            .cell("Date", date)
            .cell("Item", item)
            .cell("Qty", CellValue::Number(qty))
            .cell("Revenue", revenue)
    }

    fn sales_columns() -> Vec<String> {
        ["Date", "Item", "Qty", "Revenue"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_empty_rows_no_snapshot() {
        assert!(analyze(&sales_columns(), &[]).is_none());
        assert!(aggregate(&[], &ColumnMap::default()).is_none());
    }

    #[test]
    fn test_totals_and_best_item() {
        let rows = vec![
            sale("2025-08-10", "Latte", 3.0, "₹450"),
            sale("2025-08-10", "Momo", 5.0, "₹600"),
            sale("2025-08-11", "Latte", 4.0, "₹600"),
        ];

        let snapshot = analyze(&sales_columns(), &rows).unwrap();

        assert_eq!(snapshot.total_quantity, 12.0);
        assert_eq!(snapshot.total_revenue, 1650.0);
        assert_eq!(snapshot.best_item.name, "Latte");
        assert_eq!(snapshot.best_item.quantity, 7.0);
        assert_eq!(snapshot.day_count, 2);
        assert_eq!(snapshot.daily_average_revenue, 825.0);
    }

    #[test]
    fn test_best_item_tie_keeps_first() {
        let rows = vec![
            sale("2025-08-10", "A", 5.0, "0"),
            sale("2025-08-10", "B", 7.0, "0"),
            sale("2025-08-10", "C", 7.0, "0"),
        ];

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        assert_eq!(snapshot.best_item.name, "B");
    }

    #[test]
    fn test_best_item_placeholder_when_all_negative() {
        let rows = vec![sale("2025-08-10", "Refund", -2.0, "0")];
        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        assert_eq!(snapshot.best_item.name, BEST_ITEM_PLACEHOLDER);
    }

    #[test]
    fn test_item_distribution_others_bucket() {
        let quantities = [50.0, 40.0, 30.0, 20.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0];
        let rows: Vec<Row> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| sale("2025-08-10", &format!("item-{i}"), *q, "0"))
            .collect();

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        let dist = &snapshot.item_distribution;

        assert_eq!(dist.len(), 9);
        for (i, entry) in dist.iter().take(8).enumerate() {
            assert_eq!(entry.name, format!("item-{i}"));
            assert_eq!(entry.quantity, quantities[i]);
        }
        assert_eq!(dist[8], ItemQuantity::new(OTHERS_LABEL, 11.0));
        assert_eq!(snapshot.distributed_quantity(), snapshot.total_quantity);
    }

    #[test]
    fn test_others_omitted_when_remainder_not_positive() {
        let mut rows: Vec<Row> = (0..8)
            .map(|i| sale("2025-08-10", &format!("item-{i}"), 10.0, "0"))
            .collect();
        rows.push(sale("2025-08-10", "freebie", 0.0, "0"));

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        assert_eq!(snapshot.item_distribution.len(), 8);
        assert!(snapshot
            .item_distribution
            .iter()
            .all(|i| i.name != OTHERS_LABEL));
    }

    #[test]
    fn test_distribution_sums_to_total() {
        let rows: Vec<Row> = (0..25)
            .map(|i| sale("2025-08-10", &format!("item-{}", i % 13), (i % 4 + 1) as f64, "0"))
            .collect();

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        assert_eq!(snapshot.distributed_quantity(), snapshot.total_quantity);
    }

    #[test]
    fn test_missing_quantity_counts_rows() {
        let columns = vec!["Item".to_string(), "Price".to_string()];
        let rows: Vec<Row> = (0..6)
            .map(|i| Row::new().cell("Item", format!("item-{}", i % 2)).cell("Price", "100"))
            .collect();

        let snapshot = analyze(&columns, &rows).unwrap();
        assert_eq!(snapshot.total_quantity, 6.0);
        assert_eq!(snapshot.total_revenue, 600.0);
    }

    #[test]
    fn test_missing_revenue_is_zero() {
        let columns = vec!["Item".to_string(), "Qty".to_string()];
        let rows = vec![Row::new().cell("Item", "Tea").cell("Qty", "2")];

        let snapshot = analyze(&columns, &rows).unwrap();
        assert_eq!(snapshot.total_revenue, 0.0);
        assert_eq!(snapshot.total_quantity, 2.0);
    }

    #[test]
    fn test_missing_item_and_category_defaults() {
        let columns = vec!["Qty".to_string()];
        let rows = vec![Row::new().cell("Qty", "3"), Row::new().cell("Qty", "N/A")];

        let snapshot = analyze(&columns, &rows).unwrap();
        assert_eq!(snapshot.best_item.name, UNKNOWN_ITEM);
        assert_eq!(snapshot.total_quantity, 3.0);
        assert_eq!(
            snapshot.category_distribution,
            vec![ItemQuantity::new(OTHER_CATEGORY, 3.0)]
        );
    }

    #[test]
    fn test_blank_category_cell_is_other() {
        let columns = vec!["Item".to_string(), "Category".to_string()];
        let rows = vec![
            Row::new().cell("Item", "Latte").cell("Category", "Coffee"),
            Row::new().cell("Item", "Brownie").cell("Category", CellValue::Null),
            Row::new().cell("Item", "Fries").cell("Category", ""),
        ];

        let snapshot = analyze(&columns, &rows).unwrap();
        assert_eq!(
            snapshot.category_distribution,
            vec![
                ItemQuantity::new(OTHER_CATEGORY, 2.0),
                ItemQuantity::new("Coffee", 1.0),
            ]
        );
    }

    #[test]
    fn test_unparseable_values_still_counted() {
        let rows = vec![
            sale("2025-08-10", "Latte", 1.0, "₹1,234.50 approx"),
            sale("2025-08-10", "Latte", 1.0, "N/A"),
        ];

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        assert_eq!(snapshot.total_revenue, 1234.5);
        assert_eq!(snapshot.total_quantity, 2.0);
    }

    #[test]
    fn test_daily_average() {
        let rows = vec![
            sale("2025-08-10", "A", 1.0, "5000"),
            sale("2025-08-11", "A", 1.0, "4000"),
            sale("2025-08-12", "A", 1.0, "6000"),
        ];
        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        assert_eq!(snapshot.daily_average_revenue, 5000.0);

        let columns = vec!["Item".to_string(), "Revenue".to_string()];
        let undated = vec![
            Row::new().cell("Item", "A").cell("Revenue", "9000"),
            Row::new().cell("Item", "B").cell("Revenue", "6000"),
        ];
        let snapshot = analyze(&columns, &undated).unwrap();
        assert_eq!(snapshot.day_count, 0);
        assert_eq!(snapshot.daily_average_revenue, 15000.0);
        assert!(snapshot.daily_series.is_empty());
        assert!(snapshot.daily_breakdowns.is_empty());
    }

    #[test]
    fn test_daily_series_last_seven_ascending() {
        let rows: Vec<Row> = (1..=10)
            .rev()
            .map(|d| sale(&format!("2025-08-{d:02}"), "Latte", d as f64, &format!("{}", d * 100)))
            .collect();

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        let days: Vec<&str> = snapshot.daily_series.iter().map(|d| d.day.as_str()).collect();

        assert_eq!(
            days,
            vec![
                "2025-08-04",
                "2025-08-05",
                "2025-08-06",
                "2025-08-07",
                "2025-08-08",
                "2025-08-09",
                "2025-08-10"
            ]
        );
        assert_eq!(snapshot.daily_series[6].quantity, 10.0);
        assert_eq!(snapshot.daily_series[6].revenue, 1000.0);

        // Breakdowns cover every day, newest first
        assert_eq!(snapshot.daily_breakdowns.len(), 10);
        assert_eq!(snapshot.daily_breakdowns[0].day, "2025-08-10");
        assert_eq!(snapshot.daily_breakdowns[9].day, "2025-08-01");
    }

    #[test]
    fn test_dates_canonicalized_and_raw_keys_kept() {
        let rows = vec![
            sale("8/10/2025", "Latte", 1.0, "100"),
            sale("2025-08-10", "Latte", 2.0, "200"),
            sale("someday", "Momo", 1.0, "50"),
            sale("", "Momo", 4.0, "80"),
        ];

        let snapshot = analyze(&sales_columns(), &rows).unwrap();

        assert_eq!(snapshot.day_count, 2);
        let aug10 = snapshot.day("2025-08-10").unwrap();
        assert_eq!(aug10.items_sold, 3.0);
        assert_eq!(aug10.revenue, 300.0);
        assert_eq!(snapshot.day("someday").unwrap().items_sold, 1.0);

        // The undated row still counts towards totals
        assert_eq!(snapshot.total_quantity, 8.0);
    }

    #[test]
    fn test_whitespace_date_grouped_under_raw_text() {
        let columns = vec!["Date".to_string(), "Item".to_string()];
        let rows = vec![Row::new().cell("Date", "   ").cell("Item", "Latte")];

        let snapshot = analyze(&columns, &rows).unwrap();

        assert_eq!(snapshot.day_count, 1);
        let day = snapshot.day("   ").unwrap();
        assert_eq!(day.items_sold, 1.0);
        assert_eq!(day.top_items[0].name, "Latte");
    }

    #[test]
    fn test_daily_top_items_capped_and_stable() {
        let items = [("A", 2.0), ("B", 5.0), ("C", 2.0), ("D", 1.0), ("E", 3.0), ("F", 2.0)];
        let rows: Vec<Row> = items
            .iter()
            .map(|(name, q)| sale("2025-08-10", name, *q, "0"))
            .collect();

        let snapshot = analyze(&sales_columns(), &rows).unwrap();
        let top: Vec<&str> = snapshot.daily_breakdowns[0]
            .top_items
            .iter()
            .map(|i| i.name.as_str())
            .collect();

        assert_eq!(top, vec!["B", "E", "A", "C", "F"]);
    }

    #[test]
    fn test_deterministic() {
        let rows: Vec<Row> = (0..40)
            .map(|i| {
                sale(
                    &format!("2025-08-{:02}", i % 9 + 1),
                    &format!("item-{}", i % 7),
                    (i % 3) as f64,
                    &format!("₹{}", i * 37),
                )
            })
            .collect();

        let first = analyze(&sales_columns(), &rows).unwrap();
        let second = analyze(&sales_columns(), &rows).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
