use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use service::subscription::{CreatedId, FilterParams, ListResult, SubscriptionPayload, SumResult};
use tracing::info;

use crate::{errors::JsonApiError, state::AppState};

type ApiResult<T> = Result<T, JsonApiError>;

fn query_params(q: Result<Query<FilterParams>, QueryRejection>) -> ApiResult<FilterParams> {
    q.map(|Query(p)| p).map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.body_text()))
    })
}

#[utoipa::path(
    post, path = "/service", tag = "service",
    request_body = crate::openapi::SubscriptionDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CreatedIdDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    body: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedId>)> {
    let Json(input) = body?;
    let created = state.subscriptions.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/service/{id}", tag = "service",
    params(("id" = i32, Path, description = "Record id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubscriptionPayload>> {
    Ok(Json(state.subscriptions.get(&id).await?))
}

#[utoipa::path(
    put, path = "/service/{id}", tag = "service",
    params(("id" = i32, Path, description = "Record id")),
    request_body = crate::openapi::SubscriptionDoc,
    responses(
        (status = 204, description = "Replaced"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(input) = body?;
    state.subscriptions.update(&id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/service/{id}", tag = "service",
    params(("id" = i32, Path, description = "Record id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.subscriptions.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/service", tag = "service",
    params(crate::openapi::FilterQueryDoc),
    responses(
        (status = 200, description = "List OK", body = crate::openapi::ListResultDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    q: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<Json<ListResult>> {
    let params = query_params(q)?;
    let res = state.subscriptions.list(&params).await?;
    info!(count = res.items.len(), "list services");
    Ok(Json(res))
}

#[utoipa::path(
    get, path = "/service/sum", tag = "service",
    params(crate::openapi::FilterQueryDoc),
    responses(
        (status = 200, description = "Total price", body = crate::openapi::SumResultDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn sum_services(
    State(state): State<AppState>,
    q: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<Json<SumResult>> {
    let params = query_params(q)?;
    Ok(Json(state.subscriptions.sum(&params).await?))
}
