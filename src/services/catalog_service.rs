use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{
        CreateProductRequest, CreateRentalItemRequest, MitraDetail, MitraList, ProductList,
        RentalItemList, ServiceList, TechnicianDetail, TechnicianList, UpdateProductRequest,
        UpdateRentalItemRequest, check_amount, check_name, check_stock,
    },
    entity::{
        Orders, Users,
        mitra_images::{self, Entity as MitraImages},
        mitra_services::{self, Entity as MitraServices},
        mitras::{self, Entity as Mitras},
        orders,
        products::{self, ActiveModel as ProductActive, Entity as Products},
        rental_items::{self, ActiveModel as RentalActive, Entity as RentalItems},
        reviews::{self, Entity as Reviews},
        services::{self as service_entity, Entity as Services},
        technicians::{self, Entity as Technicians},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Mitra, MitraImage, MitraService, Product, RentalItem, Service, Technician},
    response::{ApiResponse, Meta},
    routes::params::{
        MitraQuery, ProductQuery, ProductSortBy, RentalQuery, ServiceQuery, SortOrder,
        TechnicianQuery,
    },
    services::review_service::summarize,
    state::AppState,
};

fn search_pattern(q: Option<&String>) -> Option<String> {
    q.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(products::Column::IsActive.eq(true));

    if let Some(pattern) = search_pattern(query.q.as_ref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(products::Column::Description).ilike(pattern)),
        );
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(products::Column::Category.eq(category.clone()));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(products::Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(products::Column::Price.lte(max_price));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => products::Column::CreatedAt,
        ProductSortBy::Price => products::Column::Price,
        ProductSortBy::Name => products::Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .filter(products::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(ApiResponse::success("Product", Product::from(product), None))
}

pub async fn list_rental_items(
    state: &AppState,
    query: RentalQuery,
) -> AppResult<ApiResponse<RentalItemList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(rental_items::Column::IsActive.eq(true));
    if let Some(pattern) = search_pattern(query.q.as_ref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(rental_items::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(rental_items::Column::Description).ilike(pattern)),
        );
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(rental_items::Column::Category.eq(category.clone()));
    }

    let finder = RentalItems::find()
        .filter(condition)
        .order_by_asc(rental_items::Column::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(RentalItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Rental items",
        RentalItemList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_rental_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RentalItem>> {
    let item = RentalItems::find_by_id(id)
        .filter(rental_items::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Rental item"))?;
    Ok(ApiResponse::success("Rental item", RentalItem::from(item), None))
}

pub async fn list_services(
    state: &AppState,
    query: ServiceQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(service_entity::Column::IsActive.eq(true));
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(service_entity::Column::Category.eq(category.clone()));
    }
    if let Some(technician_id) = query.technician_id {
        condition = condition.add(service_entity::Column::TechnicianId.eq(technician_id));
    }

    let finder = Services::find()
        .filter(condition)
        .order_by_desc(service_entity::Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();

    Ok(ApiResponse::success(
        "Services",
        ServiceList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_service(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Service>> {
    let service = Services::find_by_id(id)
        .filter(service_entity::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Service"))?;
    Ok(ApiResponse::success("Service", Service::from(service), None))
}

pub async fn list_technicians(
    state: &AppState,
    query: TechnicianQuery,
) -> AppResult<ApiResponse<TechnicianList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut finder = Technicians::find().order_by_desc(technicians::Column::CreatedAt);
    if let Some(available) = query.available {
        finder = finder.filter(technicians::Column::IsAvailable.eq(available));
    }
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Technician::from)
        .collect();

    Ok(ApiResponse::success(
        "Technicians",
        TechnicianList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Detail with rating derived from reviews of the technician's orders.
/// The stored `rating`/`total_review` columns are not kept in sync.
pub async fn get_technician(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<TechnicianDetail>> {
    let (technician, user) = Technicians::find_by_id(id)
        .find_also_related(Users)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Technician"))?;

    let ratings: Vec<i32> = Reviews::find()
        .select_only()
        .column(reviews::Column::Rating)
        .inner_join(Orders)
        .filter(orders::Column::TechnicianId.eq(technician.id))
        .into_tuple()
        .all(&state.orm)
        .await?;
    let summary = summarize(&ratings);

    let services = Services::find()
        .filter(service_entity::Column::TechnicianId.eq(technician.id))
        .filter(service_entity::Column::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();

    Ok(ApiResponse::success(
        "Technician",
        TechnicianDetail {
            technician: Technician::from(technician),
            name: user.map(|u| u.name).unwrap_or_default(),
            average_rating: summary.average,
            review_count: summary.count,
            services,
        },
        None,
    ))
}

pub async fn list_mitras(
    state: &AppState,
    query: MitraQuery,
) -> AppResult<ApiResponse<MitraList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all()
        .add(mitras::Column::IsApproved.eq(true))
        .add(mitras::Column::IsActive.eq(true));
    if let Some(city) = query.city.as_ref().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        condition = condition.add(Expr::col(mitras::Column::City).ilike(city.to_string()));
    }

    let finder = Mitras::find()
        .filter(condition)
        .order_by_desc(mitras::Column::Rating);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Mitra::from)
        .collect();

    Ok(ApiResponse::success(
        "Mitras",
        MitraList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn load_mitra_detail(
    state: &AppState,
    mitra: mitras::Model,
) -> AppResult<MitraDetail> {
    let services = MitraServices::find()
        .filter(mitra_services::Column::MitraId.eq(mitra.id))
        .order_by_asc(mitra_services::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MitraService::from)
        .collect();
    let images = MitraImages::find()
        .filter(mitra_images::Column::MitraId.eq(mitra.id))
        .order_by_asc(mitra_images::Column::Position)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MitraImage::from)
        .collect();
    Ok(MitraDetail {
        mitra: Mitra::from(mitra),
        services,
        images,
    })
}

pub async fn get_mitra(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MitraDetail>> {
    let mitra = Mitras::find_by_id(id)
        .filter(mitras::Column::IsApproved.eq(true))
        .filter(mitras::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Mitra"))?;
    let detail = load_mitra_detail(state, mitra).await?;
    Ok(ApiResponse::success("Mitra", detail, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    check_name(&payload.name)?;
    check_amount(payload.price, "price")?;
    check_stock(payload.stock)?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category: Set(payload.category),
        brand: Set(payload.brand),
        image_url: Set(payload.image_url),
        price: Set(payload.price),
        stock: Set(payload.stock),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        check_name(&name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(Some(brand));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(price) = payload.price {
        check_amount(price, "price")?;
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        check_stock(stock)?;
        active.stock = Set(stock);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn create_rental_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRentalItemRequest,
) -> AppResult<ApiResponse<RentalItem>> {
    ensure_admin(user)?;
    check_name(&payload.name)?;
    check_amount(payload.price_per_day, "price_per_day")?;
    check_stock(payload.stock)?;

    let item = RentalActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category: Set(payload.category),
        image_url: Set(payload.image_url),
        price_per_day: Set(payload.price_per_day),
        stock: Set(payload.stock),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "rental_item_create",
        "rental_items",
        serde_json::json!({ "rental_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Rental item created",
        RentalItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_rental_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRentalItemRequest,
) -> AppResult<ApiResponse<RentalItem>> {
    ensure_admin(user)?;
    let existing = RentalItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Rental item"))?;

    let mut active: RentalActive = existing.into();
    if let Some(name) = payload.name {
        check_name(&name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(price_per_day) = payload.price_per_day {
        check_amount(price_per_day, "price_per_day")?;
        active.price_per_day = Set(price_per_day);
    }
    if let Some(stock) = payload.stock {
        check_stock(stock)?;
        active.stock = Set(stock);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let item = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        RentalItem::from(item),
        Some(Meta::empty()),
    ))
}
