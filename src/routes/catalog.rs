use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{
        MitraDetail, MitraList, ProductList, RentalItemList, ServiceList, TechnicianDetail,
        TechnicianList,
    },
    error::AppResult,
    extract::AppQuery,
    models::{Product, RentalItem, Service},
    response::ApiResponse,
    routes::params::{MitraQuery, ProductQuery, RentalQuery, ServiceQuery, TechnicianQuery},
    services::catalog_service,
    state::AppState,
};

/// Public catalog reads. No session is needed for any of these.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/rentals", get(list_rental_items))
        .route("/rentals/{id}", get(get_rental_item))
        .route("/services", get(list_services))
        .route("/services/{id}", get(get_service))
        .route("/technicians", get(list_technicians))
        .route("/technicians/{id}", get(get_technician))
        .route("/mitras", get(list_mitras))
        .route("/mitras/{id}", get(get_mitra))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name/description"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price"),
        ("sort_by" = Option<String>, Query, description = "Sort by: created_at, price, name"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses((status = 200, description = "List products", body = ApiResponse<ProductList>)),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rentals",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name/description"),
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses((status = 200, description = "List rental items", body = ApiResponse<RentalItemList>)),
    tag = "Catalog"
)]
pub async fn list_rental_items(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RentalQuery>,
) -> AppResult<Json<ApiResponse<RentalItemList>>> {
    let resp = catalog_service::list_rental_items(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rentals/{id}",
    params(("id" = Uuid, Path, description = "Rental item id")),
    responses(
        (status = 200, description = "Rental item", body = ApiResponse<RentalItem>),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog"
)]
pub async fn get_rental_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RentalItem>>> {
    let resp = catalog_service::get_rental_item(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("technician_id" = Option<Uuid>, Query, description = "Filter by technician")
    ),
    responses((status = 200, description = "List services", body = ApiResponse<ServiceList>)),
    tag = "Catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ServiceQuery>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = catalog_service::list_services(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service", body = ApiResponse<Service>),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog"
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::get_service(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/technicians",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("available" = Option<bool>, Query, description = "Filter by availability")
    ),
    responses((status = 200, description = "List technicians", body = ApiResponse<TechnicianList>)),
    tag = "Catalog"
)]
pub async fn list_technicians(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TechnicianQuery>,
) -> AppResult<Json<ApiResponse<TechnicianList>>> {
    let resp = catalog_service::list_technicians(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/technicians/{id}",
    params(("id" = Uuid, Path, description = "Technician id")),
    responses(
        (status = 200, description = "Technician with rating and services", body = ApiResponse<TechnicianDetail>),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog"
)]
pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TechnicianDetail>>> {
    let resp = catalog_service::get_technician(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mitras",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("city" = Option<String>, Query, description = "Filter by city, case-insensitive")
    ),
    responses((status = 200, description = "List approved mitras", body = ApiResponse<MitraList>)),
    tag = "Catalog"
)]
pub async fn list_mitras(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MitraQuery>,
) -> AppResult<Json<ApiResponse<MitraList>>> {
    let resp = catalog_service::list_mitras(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mitras/{id}",
    params(("id" = Uuid, Path, description = "Mitra id")),
    responses(
        (status = 200, description = "Mitra with services and images", body = ApiResponse<MitraDetail>),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog"
)]
pub async fn get_mitra(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MitraDetail>>> {
    let resp = catalog_service::get_mitra(&state, id).await?;
    Ok(Json(resp))
}
