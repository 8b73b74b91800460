use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{InventoryAdjustRequest, LowStockList, MitraApprovalRequest, UpdateUserRequest, UserList},
        catalog::{
            CreateProductRequest, CreateRentalItemRequest, CreateTechnicianRequest,
            UpdateProductRequest, UpdateRentalItemRequest,
        },
        orders::OrderList,
    },
    error::AppResult,
    extract::{AppJson, AppQuery},
    middleware::auth::AuthUser,
    models::{Product, RentalItem, Technician, User},
    response::{ApiResponse, Created, with_status},
    routes::params::{LowStockQuery, OrderListQuery, UserListQuery},
    services::{admin_service, catalog_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", patch(update_user).delete(delete_user))
        .route("/mitras/{id}/approval", patch(set_mitra_approval))
        .route("/technicians", post(create_technician))
        .route("/products", post(create_product))
        .route("/products/{id}", patch(update_product))
        .route("/rentals", post(create_rental_item))
        .route("/rentals/{id}", patch(update_rental_item))
        .route("/orders", get(list_all_orders))
        .route("/inventory/low-stock", get(list_low_stock))
        .route("/inventory/{id}", patch(adjust_inventory))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("role" = Option<String>, Query, description = "Filter by role")
    ),
    responses(
        (status = 200, description = "Users", body = ApiResponse<UserList>),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 403, description = "Target is SUPER_ADMIN or promotion to SUPER_ADMIN"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::update_user(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<User>),
        (status = 400, description = "User still has orders"),
        (status = 403, description = "Target is SUPER_ADMIN"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::delete_user(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/mitras/{id}/approval",
    params(("id" = Uuid, Path, description = "Mitra user id")),
    request_body = MitraApprovalRequest,
    responses(
        (status = 200, description = "Mitra status updated", body = ApiResponse<User>),
        (status = 400, description = "User is not a mitra"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_mitra_approval(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<MitraApprovalRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::set_mitra_approval(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/technicians",
    request_body = CreateTechnicianRequest,
    responses(
        (status = 201, description = "Technician created", body = ApiResponse<Technician>),
        (status = 400, description = "User already has a technician profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_technician(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateTechnicianRequest>,
) -> AppResult<Created<Technician>> {
    let resp = admin_service::create_technician(&state, &user, payload).await?;
    Ok(with_status(StatusCode::CREATED, resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses((status = 201, description = "Product created", body = ApiResponse<Product>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    let resp = catalog_service::create_product(&state, &user, payload).await?;
    Ok(with_status(StatusCode::CREATED, resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/rentals",
    request_body = CreateRentalItemRequest,
    responses((status = 201, description = "Rental item created", body = ApiResponse<RentalItem>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_rental_item(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateRentalItemRequest>,
) -> AppResult<Created<RentalItem>> {
    let resp = catalog_service::create_rental_item(&state, &user, payload).await?;
    Ok(with_status(StatusCode::CREATED, resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/rentals/{id}",
    params(("id" = Uuid, Path, description = "Rental item id")),
    request_body = UpdateRentalItemRequest,
    responses(
        (status = 200, description = "Rental item updated", body = ApiResponse<RentalItem>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_rental_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateRentalItemRequest>,
) -> AppResult<Json<ApiResponse<RentalItem>>> {
    let resp = catalog_service::update_rental_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
    (status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>),
    (status = 401, description = "Not an admin"),
    (status = 500, description = "Internal Server Error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/inventory/low-stock",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("threshold" = Option<i32>, Query, description = "Stock threshold, default 5")
    ),
    responses(
        (status = 200, description = "Low stock products", body = ApiResponse<LowStockList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<LowStockQuery>,
) -> AppResult<Json<ApiResponse<LowStockList>>> {
    let resp = admin_service::list_low_stock(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/inventory/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = InventoryAdjustRequest,
    responses(
        (status = 200, description = "Adjust inventory", body = ApiResponse<Product>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<InventoryAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::adjust_inventory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
