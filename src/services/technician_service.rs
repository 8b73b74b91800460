use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{CreateServiceRequest, UpdateServiceRequest, check_name, check_service_pricing},
    entity::services::{self as service_entity, ActiveModel as ServiceActive, Entity as Services},
    entity::technicians::{self, Entity as Technicians},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Service,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Technician profile owned by `user_id`, if any.
pub async fn technician_of<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Option<technicians::Model>> {
    let technician = Technicians::find()
        .filter(technicians::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    Ok(technician)
}

async fn require_technician(state: &AppState, user: &AuthUser) -> AppResult<technicians::Model> {
    technician_of(&state.orm, user.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Loads a service and checks it belongs to `technician_id`.
async fn owned_service(
    state: &AppState,
    technician_id: Uuid,
    id: Uuid,
) -> AppResult<service_entity::Model> {
    let service = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Service"))?;
    if service.technician_id != technician_id {
        return Err(AppError::Unauthorized);
    }
    Ok(service)
}

pub async fn list_my_services(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Service>>> {
    let technician = require_technician(state, user).await?;
    let items = Services::find()
        .filter(service_entity::Column::TechnicianId.eq(technician.id))
        .order_by_desc(service_entity::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();
    Ok(ApiResponse::success("Services", items, Some(Meta::empty())))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    let technician = require_technician(state, user).await?;
    check_name(&payload.name)?;
    if payload.category.trim().is_empty() {
        return Err(AppError::validation("category is required"));
    }
    check_service_pricing(payload.price, payload.min_price, payload.max_price)?;

    let service = ServiceActive {
        id: Set(Uuid::new_v4()),
        technician_id: Set(technician.id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category: Set(payload.category.trim().to_string()),
        price: Set(payload.price),
        min_price: Set(payload.min_price),
        max_price: Set(payload.max_price),
        duration: Set(payload.duration),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "service_create",
        "services",
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service created",
        Service::from(service),
        Some(Meta::empty()),
    ))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    let technician = require_technician(state, user).await?;
    let existing = owned_service(state, technician.id, id).await?;

    let price = payload.price.or(existing.price);
    let min_price = payload.min_price.or(existing.min_price);
    let max_price = payload.max_price.or(existing.max_price);
    check_service_pricing(price, min_price, max_price)?;

    let mut active: ServiceActive = existing.into();
    if let Some(name) = payload.name {
        check_name(&name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(duration) = payload.duration {
        active.duration = Set(Some(duration));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.price = Set(price);
    active.min_price = Set(min_price);
    active.max_price = Set(max_price);
    active.updated_at = Set(Utc::now().into());

    let service = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        Service::from(service),
        Some(Meta::empty()),
    ))
}

pub async fn delete_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let technician = require_technician(state, user).await?;
    let service = owned_service(state, technician.id, id).await?;

    // Orders keep their history through order_items.service_id ON DELETE SET NULL.
    Services::delete_by_id(service.id).exec(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "service_delete",
        "services",
        serde_json::json!({ "service_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
