//! Salesdash Web Server
//!
//! Axum-based REST API for the sales analytics dashboard.
//!
//! The dataset is loaded once and shared read-only; every request carries its
//! own filter selection, so handlers hold no per-session state.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (question length, chart limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use salesdash_core::charts::DEFAULT_TOP_N;
use salesdash_core::{DashboardConfig, Dataset, FilterOptions, IntentMatcher};

mod handlers;

/// Maximum accepted question length (characters)
pub const MAX_QUESTION_LEN: usize = 500;

/// Maximum groups per top-N chart
pub const MAX_TOP_N: usize = 50;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Default groups per top-N chart when the request does not ask for one
    pub chart_top_n: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            chart_top_n: DEFAULT_TOP_N,
        }
    }
}

impl From<&DashboardConfig> for ServerConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
            chart_top_n: config.chart_top_n,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub dataset: Dataset,
    pub matcher: IntentMatcher,
    /// Selector choices, computed once at startup
    pub options: FilterOptions,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(dataset: Dataset, config: ServerConfig) -> anyhow::Result<Self> {
        let matcher = IntentMatcher::new()?;
        let options = FilterOptions::from_dataset(&dataset);
        Ok(Self {
            dataset,
            matcher,
            options,
            config,
        })
    }
}

/// Create the application router
pub fn create_router(state: AppState, static_dir: Option<&str>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/filters", get(handlers::get_filters))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/charts/:id", get(handlers::get_chart))
        .route("/ask", post(handlers::ask));

    // CSP: same-origin scripts, inline styles for chart containers
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve the browser UI if a directory is provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return cors;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Bind `host:port` and serve the dashboard API until the listener fails
pub async fn serve(
    state: AppState,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    if state.dataset.is_empty() {
        warn!("⚠️  No sales records loaded - the dashboard will show empty charts");
    } else {
        info!(records = state.dataset.len(), "Dataset ready");
    }

    let app = create_router(state, static_dir);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err.into()),
        }
    }
}

#[cfg(test)]
mod tests;
