//! KPI cards and chart series for the dashboard
//!
//! The dashboard is a pure projection of a filtered view:
//! - three KPI cards (total sales, total orders, average order value)
//! - a monthly sales trend
//! - top categories and top cities by sales
//! - the order status distribution
//!
//! Rendering is left to the client; these types only carry the series.

use serde::Serialize;

use crate::aggregate::{count, group_sum, mean, status_counts, top_n, total, GroupAmount};
use crate::filter::FilteredView;
use crate::format::Metric;
use crate::models::Field;

/// Title of every chart when the view is empty
pub const NO_DATA_TITLE: &str = "No data for current filters";

/// Number of groups shown in the top-N bar charts
pub const DEFAULT_TOP_N: usize = 10;

/// Headline numbers for a view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_orders: usize,
    /// 0 when the view is empty
    pub average_order_value: f64,
}

impl Kpis {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        Self {
            total_sales: total(view),
            total_orders: count(view),
            average_order_value: mean(view).unwrap_or(0.0),
        }
    }

    /// Labelled, display-ready KPI cards
    pub fn cards(&self) -> Vec<KpiCard> {
        vec![
            KpiCard::new("💰 Total Sales", Metric::Currency(self.total_sales)),
            KpiCard::new("📦 Total Orders", Metric::Count(self.total_orders)),
            KpiCard::new(
                "🧾 Avg Order Value",
                Metric::Currency(self.average_order_value),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    /// Formatted value, e.g. `₹1,234.50`
    pub value: String,
    pub metric: Metric,
}

impl KpiCard {
    fn new(label: &str, metric: Metric) -> Self {
        Self {
            label: label.to_string(),
            value: metric.to_string(),
            metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl From<GroupAmount> for ChartPoint {
    fn from(group: GroupAmount) -> Self {
        Self {
            label: group.key,
            value: group.amount,
        }
    }
}

/// One chart series ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Stable identifier: `sales-trend`, `top-categories`, `top-cities`, `order-status`
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
    /// Set on placeholders drawn for an empty view
    pub no_data: bool,
}

impl Chart {
    fn new(
        id: &str,
        title: impl Into<String>,
        kind: ChartKind,
        (x_label, y_label): (&str, &str),
        points: Vec<ChartPoint>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.into(),
            kind,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points,
            no_data: false,
        }
    }

    /// Empty chart shown in place of `id` when there is nothing to plot
    pub fn placeholder(id: &str, kind: ChartKind) -> Self {
        Self {
            id: id.to_string(),
            title: NO_DATA_TITLE.to_string(),
            kind,
            x_label: String::new(),
            y_label: String::new(),
            points: Vec::new(),
            no_data: true,
        }
    }
}

/// KPIs and charts for one filtered view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub cards: Vec<KpiCard>,
    pub charts: Vec<Chart>,
}

impl Dashboard {
    /// Project a view into KPI cards and the four charts, in display order
    pub fn project(view: &FilteredView<'_>, top: usize) -> Self {
        let kpis = Kpis::compute(view);
        let charts = if view.is_empty() {
            vec![
                Chart::placeholder("sales-trend", ChartKind::Line),
                Chart::placeholder("top-categories", ChartKind::Bar),
                Chart::placeholder("top-cities", ChartKind::Bar),
                Chart::placeholder("order-status", ChartKind::Pie),
            ]
        } else {
            vec![
                sales_trend(view),
                top_chart(view, Field::Category, top),
                top_chart(view, Field::RegionCity, top),
                order_status(view),
            ]
        };

        Self {
            cards: kpis.cards(),
            kpis,
            charts,
        }
    }

    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.id == id)
    }
}

fn sales_trend(view: &FilteredView<'_>) -> Chart {
    let mut months = group_sum(view, Field::Month);
    // YYYY-MM sorts chronologically as text
    months.sort_by(|a, b| a.key.cmp(&b.key));

    Chart::new(
        "sales-trend",
        "📈 Monthly Sales Trend",
        ChartKind::Line,
        ("Month", "Amount"),
        months.into_iter().map(ChartPoint::from).collect(),
    )
}

fn top_chart(view: &FilteredView<'_>, field: Field, n: usize) -> Chart {
    let (id, title, axis) = match field {
        Field::RegionCity => ("top-cities", format!("📍 Top {} Cities by Sales", n), "City"),
        _ => (
            "top-categories",
            format!("📊 Top {} Categories by Sales", n),
            "Category",
        ),
    };

    Chart::new(
        id,
        title,
        ChartKind::Bar,
        ("Total Sales (₹)", axis),
        top_n(view, field, n)
            .into_iter()
            .map(ChartPoint::from)
            .collect(),
    )
}

fn order_status(view: &FilteredView<'_>) -> Chart {
    Chart::new(
        "order-status",
        "📋 Order Status Distribution",
        ChartKind::Pie,
        ("Status", "Orders"),
        status_counts(view)
            .into_iter()
            .map(|s| ChartPoint {
                label: s.status,
                value: s.count as f64,
            })
            .collect(),
    )
}
