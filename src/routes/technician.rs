use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::{CreateServiceRequest, UpdateServiceRequest},
        orders::OrderList,
    },
    error::AppResult,
    extract::{AppJson, AppQuery},
    middleware::auth::AuthUser,
    models::Service,
    response::{ApiResponse, Created, with_status},
    routes::params::OrderListQuery,
    services::{order_service, technician_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_assigned_orders))
        .route("/services", get(list_my_services).post(create_service))
        .route("/services/{id}", patch(update_service).delete(delete_service))
}

#[utoipa::path(
    get,
    path = "/api/technician/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Orders assigned to the caller", body = ApiResponse<OrderList>),
        (status = 401, description = "Caller has no technician profile")
    ),
    tag = "Technician"
)]
pub async fn list_assigned_orders(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_technician_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/technician/services",
    responses((status = 200, description = "Caller's services", body = ApiResponse<Vec<Service>>)),
    tag = "Technician"
)]
pub async fn list_my_services(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Service>>>> {
    let resp = technician_service::list_my_services(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/technician/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<Service>),
        (status = 400, description = "Invalid pricing")
    ),
    tag = "Technician"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> AppResult<Created<Service>> {
    let resp = technician_service::create_service(&state, &user, payload).await?;
    Ok(with_status(StatusCode::CREATED, resp))
}

#[utoipa::path(
    patch,
    path = "/api/technician/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<Service>),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    tag = "Technician"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = technician_service::update_service(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/technician/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    tag = "Technician"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = technician_service::delete_service(&state, &user, id).await?;
    Ok(Json(resp))
}
