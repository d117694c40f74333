//! HTTP router.
//!
//! Returns a composable `Router`; JSON endpoints are nested under `/api/`
//! and a plain-text liveness probe sits at `/health`.
//!
//! Layers (outermost → innermost): trace → CORS → request timeout.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the service router from a pre-constructed `ApiContext`.
pub fn api_router(ctx: ApiContext) -> Router {
    let timeout = ctx.request_timeout;

    let api = Router::new()
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/predictions", get(endpoints::predictions::get))
        .route("/history", get(endpoints::history::list))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .route("/health", get(endpoints::health::liveness))
        .nest("/api", api)
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::models::HtmlEngine;
    use crate::pipeline::analysis::{AnalysisOrchestrator, HealthAggregator};
    use crate::pipeline::extraction::ContentExtractor;
    use crate::pipeline::prediction::{MockPredictor, MockReply, Predictor};
    use crate::store::InMemoryPredictionStore;
    use crate::test_support::{spawn_site, SitePage};

    fn test_router(predictor: MockPredictor) -> Router {
        let predictor: Arc<dyn Predictor> = Arc::new(predictor);
        let orchestrator = AnalysisOrchestrator::new(
            Arc::new(ContentExtractor::new(HtmlEngine::Dom).unwrap()),
            predictor.clone(),
            Arc::new(InMemoryPredictionStore::new()),
        );
        api_router(ApiContext::new(orchestrator, HealthAggregator::new(predictor)))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn analyze_text_then_fetch_and_list() {
        let app = test_router(MockPredictor::labelled("FAKE", 0.92));

        let (status, json) = call(
            &app,
            post_json("/api/analyze", r#"{"type":"text","content":"Aliens built the pyramids"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let prediction = &json["prediction"];
        assert_eq!(prediction["result"], "FAKE");
        assert_eq!(prediction["confidence"], 0.92);
        assert_eq!(prediction["request_type"], "text");
        assert_eq!(prediction["original_content"], "Aliens built the pyramids");
        assert_eq!(prediction["model_version"], "mock");
        assert!(prediction["processing_time_ms"].is_u64());
        assert!(prediction["created_at"].is_string());
        let id = prediction["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let (status, fetched) = call(&app, get(&format!("/api/predictions?id={id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&fetched, prediction);

        let (status, history) = call(&app, get("/api/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["success"], true);
        assert_eq!(history["count"], 1);
        assert_eq!(history["history"][0]["id"], id.as_str());
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let app = test_router(MockPredictor::new(MockReply::Echo { prefix: String::new() }));
        for text in ["first", "second", "third"] {
            let body = json!({ "type": "text", "content": text }).to_string();
            let (status, _) = call(&app, post_json("/api/analyze", &body)).await;
            assert_eq!(status, StatusCode::OK);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let (_, history) = call(&app, get("/api/history")).await;
        assert_eq!(history["count"], 3);
        assert_eq!(history["history"][0]["result"], "third");
        assert_eq!(history["history"][2]["result"], "first");
    }

    #[tokio::test]
    async fn empty_history() {
        let app = test_router(MockPredictor::labelled("REAL", 0.1));
        let (status, json) = call(&app, get("/api/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 0);
        assert_eq!(json["history"], json!([]));
    }

    #[tokio::test]
    async fn malformed_bodies_are_400() {
        let app = test_router(MockPredictor::labelled("FAKE", 0.9));
        for body in ["{not json", r#"{"type":"text"}"#, r#""just a string""#] {
            let (status, json) = call(&app, post_json("/api/analyze", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["success"], false);
            assert_eq!(json["error"]["code"], "BAD_REQUEST");
            assert_eq!(json["error"]["message"], "Invalid request body");
        }
    }

    #[tokio::test]
    async fn validation_failures_are_400() {
        let predictor = MockPredictor::labelled("FAKE", 0.9);
        let app = test_router(predictor);

        let (status, json) =
            call(&app, post_json("/api/analyze", r#"{"type":"video","content":"x"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");

        let (status, json) =
            call(&app, post_json("/api/analyze", r#"{"type":"text","content":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "invalid request: content cannot be empty");

        let (status, json) =
            call(&app, post_json("/api/analyze", r#"{"type":"url","content":"not a url"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_URL");
    }

    #[tokio::test]
    async fn scrape_failure_is_502() {
        let site = spawn_site().await;
        let app = test_router(MockPredictor::labelled("FAKE", 0.9));

        let body = json!({ "type": "url", "content": site.url(SitePage::Missing) }).to_string();
        let (status, json) = call(&app, post_json("/api/analyze", &body)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "SCRAPE_FAILED");
    }

    #[tokio::test]
    async fn url_analysis_succeeds() {
        let site = spawn_site().await;
        let app = test_router(MockPredictor::new(MockReply::Echo { prefix: String::new() }));

        let url = site.url(SitePage::Article);
        let body = json!({ "type": "url", "content": url }).to_string();
        let (status, json) = call(&app, post_json("/api/analyze", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["prediction"]["result"], "Hello world, this is content.");
        assert_eq!(json["prediction"]["original_content"], url.as_str());
        assert_eq!(json["prediction"]["request_type"], "url");
    }

    #[tokio::test]
    async fn delegate_failure_is_503() {
        let app = test_router(MockPredictor::new(MockReply::Rejected { status: 500 }));
        let (status, json) =
            call(&app, post_json("/api/analyze", r#"{"type":"text","content":"x"}"#)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "PREDICTION_FAILED");
    }

    #[tokio::test]
    async fn prediction_lookup_errors() {
        let app = test_router(MockPredictor::labelled("FAKE", 0.9));

        for uri in ["/api/predictions", "/api/predictions?id="] {
            let (status, json) = call(&app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"]["message"], "Prediction ID is required");
        }

        let (status, json) = call(&app, get("/api/predictions?id=missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn api_health_reports_delegate_state() {
        let app = test_router(MockPredictor::labelled("FAKE", 0.9));
        let (status, json) = call(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["ml_service"], "up");

        let app = test_router(MockPredictor::labelled("FAKE", 0.9).unhealthy());
        let (status, json) = call(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["ml_service"], "down");
    }

    #[tokio::test]
    async fn liveness_is_plain_ok() {
        let app = test_router(MockPredictor::labelled("FAKE", 0.9).unhealthy());
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_router(MockPredictor::labelled("FAKE", 0.9));
        let response = app.oneshot(get("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
