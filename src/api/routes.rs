use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::warn;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::config::CorsConfig;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Questionnaire
        .route("/v1/questions", get(handlers::list_questions::<S>))
        .route("/v1/answers", post(handlers::create_answers::<S>))
}

/// CORS policy for the kiosk frontend origins. Unparseable origins are skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, Locale, NewQuestion, Translation};
    use crate::store::{MemoryStore, QuestionStore, ResponseStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn app_with_question() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .create_question(NewQuestion {
                parent_id: None,
                content: Some(ContentType::Text),
                order: 0,
                unit: None,
                labels: vec![
                    Translation::new(Locale::En, "What is your name?"),
                    Translation::new(Locale::Fr, "Quel est votre nom ?"),
                ],
            })
            .await
            .unwrap();
        (create_router().with_state(store.clone()), store)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_questions_default_to_english() {
        let (app, _) = app_with_question().await;
        let response = app
            .oneshot(Request::get("/v1/questions").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json[0]["label"], "What is your name?");
        assert_eq!(json[0]["content"], "TEXT");
    }

    #[tokio::test]
    async fn test_unsupported_locale_is_bad_request() {
        let (app, _) = app_with_question().await;
        let response = app
            .oneshot(
                Request::get("/v1/questions?locale=de")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_answers_returns_created() {
        let (app, store) = app_with_question().await;
        let response = app
            .oneshot(
                Request::post("/v1/answers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"[{"questionId": 1, "answer": "John Doe"}]"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Answers saved successfully");
        assert_eq!(store.list_answers().await.unwrap().len(), 1);
    }

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        let config = CorsConfig {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "bad\norigin".to_string(),
            ],
        };
        // Building the layer must not panic on the invalid entry
        let _layer = cors_layer(&config);
    }
}
