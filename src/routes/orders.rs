use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        BookingRequest, OrderCreated, OrderList, OrderWithItems, RentalOrderCreated,
        RentalOrderRequest, SparepartOrderRequest, UpdateOrderStatusRequest,
    },
    error::AppResult,
    extract::{AppJson, AppQuery},
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/sparepart", post(create_sparepart_order))
        .route("/rental", post(create_rental_order))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_order_status))
}

pub fn bookings_router() -> Router<AppState> {
    Router::new().route("/", post(create_booking))
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Service booked", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Missing field"),
        (status = 401, description = "No session"),
        (status = 404, description = "Service not found")
    ),
    tag = "Orders"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<BookingRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::create_service_booking(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/sparepart",
    request_body = SparepartOrderRequest,
    responses(
        (status = 200, description = "Sparepart ordered", body = ApiResponse<OrderCreated>),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Product not found")
    ),
    tag = "Orders"
)]
pub async fn create_sparepart_order(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<SparepartOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderCreated>>> {
    let resp = order_service::create_sparepart_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/rental",
    request_body = RentalOrderRequest,
    responses(
        (status = 200, description = "Rental booked", body = ApiResponse<RentalOrderCreated>),
        (status = 400, description = "Invalid duration or out of stock"),
        (status = 404, description = "Rental item not found")
    ),
    tag = "Orders"
)]
pub async fn create_rental_order(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<RentalOrderRequest>,
) -> AppResult<Json<ApiResponse<RentalOrderCreated>>> {
    let resp = order_service::create_rental_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses((status = 200, description = "Caller's orders", body = ApiResponse<OrderList>)),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 401, description = "Caller may not make this transition"),
        (status = 404, description = "Not found")
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
