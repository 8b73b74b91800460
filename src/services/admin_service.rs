use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    audit,
    db::{is_foreign_key_violation, is_unique_violation},
    dto::admin::{
        InventoryAdjustRequest, LowStockList, MitraApprovalRequest, UpdateUserRequest, UserList,
    },
    entity::{
        MitraStatus, UserRole,
        mitras::{self, Entity as Mitras},
        products::{self, ActiveModel as ProductActive, Entity as Products},
        technicians::{ActiveModel as TechnicianActive, Entity as Technicians},
        users::{self, ActiveModel as UserActive, Entity as Users},
    },
    dto::catalog::CreateTechnicianRequest,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Product, Technician, User},
    response::{ApiResponse, Meta},
    routes::params::{LowStockQuery, UserListQuery},
    state::AppState,
};

const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

async fn find_user(state: &AppState, id: Uuid) -> AppResult<users::Model> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Users::find().order_by_desc(users::Column::CreatedAt);
    if let Some(role) = query.role {
        finder = finder.filter(users::Column::Role.eq(role));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// The SUPER_ADMIN account can never be edited through the API, and no one
/// can be promoted into that role.
pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let target = find_user(state, id).await?;
    if target.role == UserRole::SuperAdmin {
        return Err(AppError::Forbidden("Cannot modify SUPER_ADMIN".into()));
    }
    if payload.role == Some(UserRole::SuperAdmin) {
        return Err(AppError::Forbidden("Cannot promote to SUPER_ADMIN".into()));
    }

    let mut active: UserActive = target.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        active.name = Set(name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(mitra_status) = payload.mitra_status {
        active.mitra_status = Set(Some(mitra_status));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "user_update",
        "users",
        serde_json::json!({ "target_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::success("User updated", User::from(updated), Some(Meta::empty())))
}

pub async fn delete_user(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let target = find_user(state, id).await?;
    if target.role == UserRole::SuperAdmin {
        return Err(AppError::Forbidden("Cannot delete SUPER_ADMIN".into()));
    }

    Users::delete_by_id(target.id)
        .exec(&state.orm)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::BadRequest("User still has orders".into())
            } else {
                AppError::from(err)
            }
        })?;

    audit::record(
        state,
        user.user_id,
        "user_delete",
        "users",
        serde_json::json!({ "target_id": target.id }),
    )
    .await;

    Ok(ApiResponse::success("User deleted", User::from(target), Some(Meta::empty())))
}

/// Sets the account's mitra status and mirrors it onto the storefront's
/// `is_approved` flag.
pub async fn set_mitra_approval(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
    payload: MitraApprovalRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    if payload.status == MitraStatus::Pending {
        return Err(AppError::validation("status must be APPROVED or REJECTED"));
    }

    let txn = state.orm.begin().await?;
    let target = Users::find_by_id(user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    if target.role != UserRole::Mitra {
        return Err(AppError::BadRequest("User is not a mitra".into()));
    }

    let mut active: UserActive = target.into();
    active.mitra_status = Set(Some(payload.status));
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    Mitras::update_many()
        .col_expr(
            mitras::Column::IsApproved,
            Expr::value(payload.status == MitraStatus::Approved),
        )
        .col_expr(mitras::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(mitras::Column::UserId.eq(updated.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "mitra_approval",
        "users",
        serde_json::json!({ "target_id": updated.id, "status": payload.status }),
    )
    .await;

    Ok(ApiResponse::success("Mitra status updated", User::from(updated), Some(Meta::empty())))
}

pub async fn create_technician(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTechnicianRequest,
) -> AppResult<ApiResponse<Technician>> {
    ensure_admin(user)?;
    if payload.experience.is_some_and(|e| e < 0) {
        return Err(AppError::validation("experience must not be negative"));
    }
    find_user(state, payload.user_id).await?;

    let technician = TechnicianActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        bio: Set(payload.bio),
        experience: Set(payload.experience.unwrap_or(0)),
        specialties: Set(payload.specialties),
        rating: Set(0.0),
        total_review: Set(0),
        is_available: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let technician = Technicians::insert(technician)
        .exec_with_returning(&state.orm)
        .await
        .map_err(|err| {
            if is_unique_violation(&err, "user_id") {
                AppError::BadRequest("User already has a technician profile".into())
            } else {
                AppError::from(err)
            }
        })?;

    audit::record(
        state,
        user.user_id,
        "technician_create",
        "technicians",
        serde_json::json!({ "technician_id": technician.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Technician created",
        Technician::from(technician),
        Some(Meta::empty()),
    ))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<LowStockList>> {
    ensure_admin(user)?;
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let (page, limit, offset) = query.pagination().normalize();

    let finder = Products::find()
        .filter(products::Column::Stock.lte(threshold))
        .order_by_asc(products::Column::Stock)
        .order_by_desc(products::Column::CreatedAt);

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
        "Low stock",
        LowStockList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn adjust_inventory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: InventoryAdjustRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let new_stock = product.stock + payload.delta;
    if new_stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }

    let mut active: ProductActive = product.into();
    active.stock = Set(new_stock);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "inventory_adjust",
        "products",
        serde_json::json!({ "product_id": updated.id, "delta": payload.delta }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inventory updated",
        Product::from(updated),
        Some(Meta::empty()),
    ))
}
