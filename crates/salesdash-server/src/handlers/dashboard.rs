//! Dashboard handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState, MAX_TOP_N};
use salesdash_core::{Chart, Dashboard, FilterSpec};

/// Query parameters shared by the dashboard endpoints
///
/// `category`, `state` and `status` may be repeated; see
/// [`FilterSpec::from_lists`] for how values are split.
#[derive(Debug, Default)]
pub struct FilterQuery {
    pub categories: Vec<String>,
    pub states: Vec<String>,
    pub statuses: Vec<String>,
    /// Groups per top-N chart (server default if absent)
    pub top: Option<usize>,
}

impl FilterQuery {
    /// Collect raw query pairs, ignoring unknown keys
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "category" => query.categories.push(value),
                "state" => query.states.push(value),
                "status" => query.statuses.push(value),
                "top" => {
                    let n = value.trim().parse().map_err(|_| top_error())?;
                    query.top = Some(n);
                }
                _ => {}
            }
        }
        Ok(query)
    }

    fn spec(&self) -> FilterSpec {
        FilterSpec::from_lists(&self.categories, &self.states, &self.statuses)
    }

    fn top(&self, default: usize) -> Result<usize, AppError> {
        match self.top {
            None => Ok(default),
            Some(n) if (1..=MAX_TOP_N).contains(&n) => Ok(n),
            Some(_) => Err(top_error()),
        }
    }
}

fn top_error() -> AppError {
    AppError::bad_request(&format!("top must be between 1 and {}", MAX_TOP_N))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// `overall data` or `current filtered view`
    pub scope: &'static str,
    pub filters: FilterSpec,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

/// GET /api/dashboard - KPI cards and all charts for the selected filters
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DashboardResponse>, AppError> {
    let params = FilterQuery::from_pairs(pairs)?;
    let top = params.top(state.config.chart_top_n)?;
    let spec = params.spec();
    let view = state.dataset.filter(&spec);

    Ok(Json(DashboardResponse {
        scope: spec.describe(),
        dashboard: Dashboard::project(&view, top),
        filters: spec,
    }))
}

/// GET /api/charts/:id - A single chart for the selected filters
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Chart>, AppError> {
    let params = FilterQuery::from_pairs(pairs)?;
    let top = params.top(state.config.chart_top_n)?;
    let view = state.dataset.filter(&params.spec());

    Dashboard::project(&view, top)
        .charts
        .into_iter()
        .find(|c| c.id == id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("Unknown chart: {}", id)))
}
