//! Snapshot types
//!
//! The complete aggregate result for one dataset at one point in time.
//! Numbers are kept raw; currency and date formatting belong to the
//! dashboard layer.

use serde::{Deserialize, Serialize};

/// Best-item name when there are no items at all
pub const BEST_ITEM_PLACEHOLDER: &str = "—";
/// Label of the bucket collecting items beyond the top slots
pub const OTHERS_LABEL: &str = "Others";
/// Item label used when no item column exists
pub const UNKNOWN_ITEM: &str = "Unknown";
/// Category label used when no category is available
pub const OTHER_CATEGORY: &str = "Other";

/// Items shown individually in the distribution
pub const DISTRIBUTION_SLOTS: usize = 8;
/// Length of the recent-days series
pub const SERIES_DAYS: usize = 7;
/// Items listed per day in the breakdowns
pub const DAILY_TOP_ITEMS: usize = 5;

/// Aggregated view of a sales dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub total_revenue: f64,
    pub total_quantity: f64,
    pub best_item: BestItem,
    /// `total_revenue` divided by the number of distinct days (at least 1)
    pub daily_average_revenue: f64,
    /// Distinct day keys seen
    pub day_count: usize,
    /// Top items by quantity, then an optional "Others" bucket
    pub item_distribution: Vec<ItemQuantity>,
    /// Quantity per category, largest first
    pub category_distribution: Vec<ItemQuantity>,
    /// Latest days in ascending order
    pub daily_series: Vec<DayTotals>,
    /// Every day, most recent first
    pub daily_breakdowns: Vec<DailyBreakdown>,
}

impl Snapshot {
    /// Sum of the item distribution, Others bucket included
    pub fn distributed_quantity(&self) -> f64 {
        self.item_distribution.iter().map(|i| i.quantity).sum()
    }

    /// Breakdown for a single day key
    pub fn day(&self, key: &str) -> Option<&DailyBreakdown> {
        self.daily_breakdowns.iter().find(|d| d.day == key)
    }
}

/// Highest-selling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestItem {
    pub name: String,
    pub quantity: f64,
}

impl Default for BestItem {
    fn default() -> Self {
        Self {
            name: BEST_ITEM_PLACEHOLDER.to_string(),
            quantity: -1.0,
        }
    }
}

/// A named quantity (item or category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuantity {
    pub name: String,
    pub quantity: f64,
}

impl ItemQuantity {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Totals for one day of the recent series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    pub day: String,
    pub quantity: f64,
    pub revenue: f64,
}

/// Per-day summary with the day's best sellers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub day: String,
    pub revenue: f64,
    pub items_sold: f64,
    pub top_items: Vec<ItemQuantity>,
}
