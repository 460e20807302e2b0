use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod subscriptions;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router: health, API document and the `/service` resource.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/service", get(subscriptions::list_services).post(subscriptions::create_service))
        // static segment wins over `:id`
        .route("/service/sum", get(subscriptions::sum_services))
        .route(
            "/service/:id",
            get(subscriptions::get_service)
                .put(subscriptions::update_service)
                .delete(subscriptions::delete_service),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use service::subscription::repository::mock::MockSubscriptionRepository;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let state = AppState::new(Arc::new(MockSubscriptionRepository::default()));
        build_router(state, CorsLayer::very_permissive())
    }

    async fn get_json(path: &str) -> (StatusCode, serde_json::Value) {
        let res = app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn sum_route_is_not_taken_for_an_id() {
        let (status, body) = get_json("/service/sum").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "total": 0 }));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = get_json("/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/service/{id}"].is_object());
    }

    #[tokio::test]
    async fn empty_list_has_items_array() {
        let (status, body) = get_json("/service").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "items": [] }));
    }
}
