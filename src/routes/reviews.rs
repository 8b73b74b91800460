use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{ReviewIdQuery, ReviewList, ReviewQuery, ReviewRequest},
    error::AppResult,
    extract::{AppJson, AppQuery},
    middleware::auth::AuthUser,
    models::Review,
    response::{ApiResponse, Created, with_status},
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_reviews).post(submit_review).delete(delete_review_by_query),
        )
        .route("/{id}", delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<Review>),
        (status = 200, description = "Existing review updated", body = ApiResponse<Review>),
        (status = 400, description = "Rating out of range or no single subject"),
        (status = 403, description = "Not your order, or your own storefront"),
        (status = 404, description = "Subject not found")
    ),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<ReviewRequest>,
) -> AppResult<Created<Review>> {
    let (created, resp) = review_service::submit_review(&state, &user, payload).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok(with_status(status, resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("mitra_id" = Option<Uuid>, Query, description = "Reviews of a mitra"),
        ("technician_id" = Option<Uuid>, Query, description = "Reviews of a technician's orders"),
        ("order_id" = Option<Uuid>, Query, description = "Reviews of an order")
    ),
    responses((status = 200, description = "Reviews with average", body = ApiResponse<ReviewList>)),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReviewQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reviews",
    params(("id" = Uuid, Query, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 400, description = "Missing id"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    ),
    tag = "Reviews"
)]
pub async fn delete_review_by_query(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<ReviewIdQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, &user, query.id).await?;
    Ok(Json(resp))
}
