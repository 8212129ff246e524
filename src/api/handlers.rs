use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logic::{build_forest, flat_listing, resolve_questions};
use crate::model::{CreateAnswer, Locale, Question, SaveAnswersResponse};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Nested forest
    #[default]
    Tree,
    /// Every question once, sorted by order, children empty
    Flat,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

pub async fn list_questions<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<Vec<Question>>, (StatusCode, Json<ErrorResponse>)> {
    let records = match store.list_question_records(query.locale).await {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load questions for {}: {:#}", query.locale, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ));
        }
    };

    let questions = resolve_questions(query.locale, &records);
    let body = match query.layout {
        Layout::Tree => build_forest(questions),
        Layout::Flat => flat_listing(questions),
    };

    Ok(Json(body))
}

pub async fn create_answers<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(answers): RequestJson<Vec<CreateAnswer>>,
) -> Result<(StatusCode, Json<SaveAnswersResponse>), (StatusCode, Json<ErrorResponse>)> {
    match store.save_answers(&answers).await {
        Ok(stored) => {
            if let Some(first) = stored.first() {
                info!("Saved {} answers in batch {}", stored.len(), first.batch_id);
            }
            Ok((StatusCode::CREATED, Json(SaveAnswersResponse::saved())))
        }
        Err(e) => {
            error!("Failed to save {} answers: {:#}", answers.len(), e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!("Failed to save answers: {}", e))),
            ))
        }
    }
}
