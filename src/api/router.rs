//! Route table and CORS policy.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/extract", post(endpoints::extract))
        .route("/approve", post(endpoints::approve))
        .route("/suggestions_stub", get(endpoints::suggestions_stub))
        .route("/health", get(endpoints::health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::pipeline::entities::HeuristicRecognizer;
    use crate::pipeline::extractor::EventExtractor;
    use crate::pipeline::openai::FailingLlmClient;

    fn test_router() -> Router {
        let extractor = EventExtractor::new(
            Box::new(FailingLlmClient),
            Box::new(HeuristicRecognizer::new()),
        );
        build_router(
            Arc::new(AppState::new(extractor)),
            &["http://localhost:4200".to_string()],
        )
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn extract_returns_degraded_record_when_inference_fails() {
        let body = r#"{"text": "Hi Anna — dentist next Wed at 3pm, 30 minutes.",
                       "timezone": "Europe/Budapest", "source": "email"}"#;
        let response = test_router()
            .oneshot(json_post("/extract", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["confidence"], 0.4);
        assert_eq!(json["attendees"][0], "Anna");
        assert_eq!(json["timezone"], "Europe/Budapest");
    }

    #[tokio::test]
    async fn extract_rejects_empty_text() {
        let response = test_router()
            .oneshot(json_post("/extract", r#"{"text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn extract_rejects_missing_text_field() {
        let response = test_router()
            .oneshot(json_post("/extract", r#"{"source": "email"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn approve_wraps_event_in_placeholder() {
        let body = r#"{
            "event": {
                "title": "Dentist", "start": null, "end": null, "timezone": "UTC",
                "location": null, "attendees": [], "description": "",
                "reminders": [30], "recurrence": null, "confidence": 0.9,
                "raw_text_snippet": "", "source": "email", "source_meta": null
            },
            "user_id": "u-1"
        }"#;
        let response = test_router()
            .oneshot(json_post("/approve", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["calendar_event"]["id"]
            .as_str()
            .unwrap()
            .starts_with("evt_stub_"));
        assert_eq!(json["calendar_event"]["user_id"], "u-1");
        assert_eq!(json["calendar_event"]["title"], "Dentist");
    }

    #[tokio::test]
    async fn suggestions_stub_returns_sample() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/suggestions_stub")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json[0]["title"], "Dentist appointment");
        assert_eq!(json[0]["source"], "stub");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
