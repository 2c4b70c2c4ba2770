//! Domain models for salesdash

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder for categorical values absent from the source
pub const UNKNOWN: &str = "Unknown";

/// One cleaned sales transaction
///
/// Every retained record has a parsed date and a non-negative amount.
/// Missing categorical values are stored as [`UNKNOWN`], never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    /// `YYYY-MM`, derived from `date`
    pub month: String,
    pub category: String,
    /// Ship-to state, title-cased
    pub region_state: String,
    /// Ship-to city, title-cased
    pub region_city: String,
    pub status: String,
    pub amount: f64,
    pub order_id: String,
}

impl Record {
    /// Build a record, deriving `month` from `date`
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        region_state: impl Into<String>,
        region_city: impl Into<String>,
        status: impl Into<String>,
        amount: f64,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            date,
            month: month_of(date),
            category: category.into(),
            region_state: region_state.into(),
            region_city: region_city.into(),
            status: status.into(),
            amount,
            order_id: order_id.into(),
        }
    }

    /// Value of a string-typed field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Month => &self.month,
            Field::Category => &self.category,
            Field::RegionState => &self.region_state,
            Field::RegionCity => &self.region_city,
            Field::Status => &self.status,
            Field::OrderId => &self.order_id,
        }
    }
}

/// `YYYY-MM` bucket for a date
pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// String-typed record fields usable for grouping and lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Month,
    Category,
    RegionState,
    RegionCity,
    Status,
    OrderId,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Category => "category",
            Self::RegionState => "region_state",
            Self::RegionCity => "region_city",
            Self::Status => "status",
            Self::OrderId => "order_id",
        }
    }

    /// Column header in the sales report export
    pub fn column(&self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Category => "Category",
            Self::RegionState => "ship-state",
            Self::RegionCity => "ship-city",
            Self::Status => "Status",
            Self::OrderId => "Order ID",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
