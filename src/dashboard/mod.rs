//! Dashboard view model
//!
//! Turns a [`Snapshot`] into what the dashboard displays: four KPI cards,
//! chart-ready series and the daily summary list. When no snapshot is
//! available the built-in [`Dashboard::fallback`] is shown instead.

mod format;

pub use format::{day_label, format_count, group_digits, round_half_up, DisplayOptions, Grouping};

use crate::analytics::{ItemQuantity, Snapshot};
use serde::{Deserialize, Serialize};

/// Icon shown next to a KPI card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiIcon {
    Wallet,
    ShoppingBag,
    Star,
    Bolt,
}

/// Headline number card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    /// Badge next to the value; empty hides it
    pub delta: String,
    pub icon: KpiIcon,
}

impl Kpi {
    fn new(label: &str, value: String, delta: &str, icon: KpiIcon) -> Self {
        Self {
            label: label.to_string(),
            value,
            delta: delta.to_string(),
            icon,
        }
    }
}

/// One labelled value in a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Entry in the daily summary list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub label: String,
    pub revenue: f64,
    pub revenue_display: String,
    pub items_sold: f64,
    pub top_items: Vec<ItemQuantity>,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub kpis: Vec<Kpi>,
    /// Pie chart: item distribution
    pub item_distribution: Vec<ChartPoint>,
    /// Bar chart: items sold per day
    pub items_sold: Vec<ChartPoint>,
    /// Line chart: revenue per day
    pub revenue_trend: Vec<ChartPoint>,
    pub daily_summaries: Vec<DailySummary>,
}

impl Dashboard {
    /// Build the live dashboard from a snapshot
    pub fn from_snapshot(snapshot: &Snapshot, display: &DisplayOptions) -> Self {
        let kpis = vec![
            Kpi::new(
                "Total Revenue",
                display.currency(snapshot.total_revenue),
                "",
                KpiIcon::Wallet,
            ),
            Kpi::new(
                "Items Sold",
                format_count(snapshot.total_quantity),
                "",
                KpiIcon::ShoppingBag,
            ),
            Kpi::new(
                "Best Selling",
                snapshot.best_item.name.clone(),
                "Most Popular",
                KpiIcon::Star,
            ),
            Kpi::new(
                "Daily Average",
                display.currency(snapshot.daily_average_revenue),
                "",
                KpiIcon::Bolt,
            ),
        ];

        let item_distribution = snapshot
            .item_distribution
            .iter()
            .map(|i| ChartPoint::new(i.name.clone(), i.quantity))
            .collect();

        let items_sold = snapshot
            .daily_series
            .iter()
            .map(|d| ChartPoint::new(d.day.clone(), d.quantity))
            .collect();

        let revenue_trend = snapshot
            .daily_series
            .iter()
            .map(|d| ChartPoint::new(d.day.clone(), d.revenue))
            .collect();

        let daily_summaries = snapshot
            .daily_breakdowns
            .iter()
            .map(|d| DailySummary {
                date: d.day.clone(),
                label: day_label(&d.day),
                revenue: d.revenue,
                revenue_display: display.currency(d.revenue),
                items_sold: d.items_sold,
                top_items: d.top_items.clone(),
            })
            .collect();

        Self {
            kpis,
            item_distribution,
            items_sold,
            revenue_trend,
            daily_summaries,
        }
    }

    /// Demo dashboard shown while no live snapshot exists
    pub fn fallback(display: &DisplayOptions) -> Self {
        let kpis = vec![
            Kpi::new("Total Revenue", display.currency(15150.0), "+12.5%", KpiIcon::Wallet),
            Kpi::new("Items Sold", "67".to_string(), "+8.2%", KpiIcon::ShoppingBag),
            Kpi::new("Best Selling", "Momo".to_string(), "Most Popular", KpiIcon::Star),
            Kpi::new("Daily Average", display.currency(3788.0), "+5.7%", KpiIcon::Bolt),
        ];

        let points = |pairs: &[(&str, f64)]| -> Vec<ChartPoint> {
            pairs.iter().map(|(n, v)| ChartPoint::new(*n, *v)).collect()
        };

        let summary = |date: &str, revenue: f64, items_sold: f64, top: &[(&str, f64)]| DailySummary {
            date: date.to_string(),
            label: day_label(date),
            revenue,
            revenue_display: display.currency(revenue),
            items_sold,
            top_items: top.iter().map(|(n, q)| ItemQuantity::new(*n, *q)).collect(),
        };

        Self {
            kpis,
            item_distribution: points(&[
                ("Coffee", 45.0),
                ("Snacks", 25.0),
                ("Desserts", 18.0),
                ("Beverages", 12.0),
            ]),
            items_sold: points(&[
                ("Mon", 20.0),
                ("Tue", 15.0),
                ("Wed", 18.0),
                ("Thu", 22.0),
                ("Fri", 12.0),
                ("Sat", 25.0),
                ("Sun", 10.0),
            ]),
            revenue_trend: points(&[
                ("Mon", 3200.0),
                ("Tue", 3450.0),
                ("Wed", 2600.0),
                ("Thu", 2900.0),
                ("Fri", 3100.0),
                ("Sat", 3700.0),
                ("Sun", 2500.0),
            ]),
            daily_summaries: vec![
                summary(
                    "2025-08-10",
                    3100.0,
                    28.0,
                    &[("Cappuccino", 8.0), ("Veg Sandwich", 6.0), ("Brownie", 5.0)],
                ),
                summary(
                    "2025-08-11",
                    2850.0,
                    24.0,
                    &[("Momo", 7.0), ("Latte", 6.0), ("Iced Tea", 4.0)],
                ),
                summary(
                    "2025-08-12",
                    3320.0,
                    30.0,
                    &[("Espresso", 9.0), ("Chocolate Cake", 5.0), ("French Fries", 5.0)],
                ),
            ],
        }
    }

    /// Live dashboard when a snapshot exists, fallback otherwise
    pub fn from_optional(snapshot: Option<&Snapshot>, display: &DisplayOptions) -> Self {
        match snapshot {
            Some(snapshot) => Self::from_snapshot(snapshot, display),
            None => Self::fallback(display),
        }
    }

    pub fn kpi(&self, label: &str) -> Option<&Kpi> {
        self.kpis.iter().find(|k| k.label == label)
    }
}
