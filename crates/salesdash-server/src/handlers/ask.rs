//! Question answering handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState, MAX_QUESTION_LEN};
use salesdash_core::{FilterSpec, Intent};

/// Request body for asking a question
///
/// The filter selection travels with the question so the answer always
/// describes the same view the dashboard is showing.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    /// Matched intent, null when nothing matched
    pub intent: Option<Intent>,
    pub scope: &'static str,
}

/// POST /api/ask - Answer a question about the filtered data
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if req.question.chars().count() > MAX_QUESTION_LEN {
        return Err(AppError::bad_request(&format!(
            "Question must be at most {} characters",
            MAX_QUESTION_LEN
        )));
    }

    let spec = FilterSpec::new()
        .categories(req.categories)
        .states(req.states)
        .statuses(req.statuses);

    let answer = state.matcher.ask(&req.question, &state.dataset, &spec);
    debug!(
        intent = answer.intent.map(|i| i.as_str()).unwrap_or("none"),
        "Answered question"
    );

    Ok(Json(AskResponse {
        answer: answer.text,
        intent: answer.intent,
        scope: spec.describe(),
    }))
}
