use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::{catalog::MitraDetail, mitra::MitraProfileRequest},
    entity::{
        UserRole,
        mitra_images::{self, ActiveModel as ImageActive, Entity as MitraImages},
        mitra_services::{self, ActiveModel as ServiceActive, Entity as MitraServices},
        mitras::{self, ActiveModel as MitraActive, Entity as Mitras},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    response::{ApiResponse, Meta},
    services::catalog_service::load_mitra_detail,
    state::AppState,
};

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<MitraDetail>> {
    ensure_role(user, UserRole::Mitra)?;
    let mitra = Mitras::find()
        .filter(mitras::Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Mitra profile"))?;
    let detail = load_mitra_detail(state, mitra).await?;
    Ok(ApiResponse::success("Mitra profile", detail, Some(Meta::empty())))
}

/// Creates or replaces the caller's storefront. Child services and images are
/// deleted and rewritten inside the same transaction as the profile row.
/// Returns `true` when the profile was created by this call.
pub async fn put_profile(
    state: &AppState,
    user: &AuthUser,
    payload: MitraProfileRequest,
) -> AppResult<(bool, ApiResponse<MitraDetail>)> {
    ensure_role(user, UserRole::Mitra)?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let existing = Mitras::find()
        .filter(mitras::Column::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let created = existing.is_none();

    let mut active: MitraActive = match existing {
        Some(mitra) => mitra.into(),
        None => MitraActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            rating: Set(0.0),
            total_review: Set(0),
            is_approved: Set(false),
            is_active: Set(true),
            created_at: NotSet,
            ..Default::default()
        },
    };
    active.business_name = Set(payload.business_name.trim().to_string());
    active.description = Set(payload.description);
    active.address = Set(payload.address.trim().to_string());
    active.city = Set(payload.city.trim().to_string());
    active.province = Set(payload.province.trim().to_string());
    active.phone = Set(payload.phone);
    active.whatsapp = Set(payload.whatsapp);
    active.email = Set(payload.email);
    active.weekday_hours = Set(payload.weekday_hours);
    active.weekend_hours = Set(payload.weekend_hours);
    active.updated_at = Set(Utc::now().into());

    let mitra = if created {
        active.insert(&txn).await?
    } else {
        active.update(&txn).await?
    };

    MitraServices::delete_many()
        .filter(mitra_services::Column::MitraId.eq(mitra.id))
        .exec(&txn)
        .await?;
    MitraImages::delete_many()
        .filter(mitra_images::Column::MitraId.eq(mitra.id))
        .exec(&txn)
        .await?;

    let services: Vec<ServiceActive> = payload
        .services
        .into_iter()
        .map(|service| ServiceActive {
            id: Set(Uuid::new_v4()),
            mitra_id: Set(mitra.id),
            name: Set(service.name.trim().to_string()),
            description: Set(service.description),
            price: Set(service.price),
        })
        .collect();
    if !services.is_empty() {
        MitraServices::insert_many(services)
            .exec_without_returning(&txn)
            .await?;
    }

    let images: Vec<ImageActive> = payload
        .images
        .into_iter()
        .enumerate()
        .map(|(position, url)| ImageActive {
            id: Set(Uuid::new_v4()),
            mitra_id: Set(mitra.id),
            url: Set(url.trim().to_string()),
            position: Set(position as i32),
        })
        .collect();
    if !images.is_empty() {
        MitraImages::insert_many(images)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        if created { "mitra_profile_create" } else { "mitra_profile_update" },
        "mitras",
        serde_json::json!({ "mitra_id": mitra.id }),
    )
    .await;

    let detail = load_mitra_detail(state, mitra).await?;
    let message = if created { "Mitra profile created" } else { "Mitra profile updated" };
    Ok((created, ApiResponse::success(message, detail, Some(Meta::empty()))))
}
