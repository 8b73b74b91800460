#![allow(dead_code)]

use halotekno_api::{
    db::{create_orm_conn, run_migrations},
    entity::{
        MitraStatus, UserRole,
        products::{self, ActiveModel as ProductActive},
        rental_items::{self, ActiveModel as RentalActive},
        services::{self as service_entity, ActiveModel as ServiceActive},
        technicians::ActiveModel as TechnicianActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// `None` when no database is configured, so the caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;
    Ok(Some(AppState::new(orm, "integration-secret", 1)))
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub async fn create_user(
    state: &AppState,
    role: UserRole,
    mitra_status: Option<MitraStatus>,
) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", unique("user"))),
        password_hash: Set(None),
        name: Set("Test User".into()),
        phone: Set(None),
        role: Set(role),
        mitra_status: Set(mitra_status),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
        mitra_status: user.mitra_status,
    })
}

/// Creates a technician profile for a fresh user. Returns the principal and technician id.
pub async fn create_technician(state: &AppState) -> anyhow::Result<(AuthUser, Uuid)> {
    let user = create_user(state, UserRole::Customer, None).await?;
    let technician = TechnicianActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        bio: Set(None),
        experience: Set(3),
        specialties: Set(vec!["smartphone".into()]),
        rating: Set(0.0),
        total_review: Set(0),
        is_available: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok((user, technician.id))
}

pub async fn create_service(
    state: &AppState,
    technician_id: Uuid,
    price: Option<i64>,
    min_price: Option<i64>,
) -> anyhow::Result<service_entity::Model> {
    let service = ServiceActive {
        id: Set(Uuid::new_v4()),
        technician_id: Set(technician_id),
        name: Set("Ganti LCD".into()),
        description: Set(None),
        category: Set("smartphone".into()),
        price: Set(price),
        min_price: Set(min_price),
        max_price: Set(None),
        duration: Set(None),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(service)
}

pub async fn create_product(state: &AppState, price: i64, stock: i32) -> anyhow::Result<products::Model> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(unique("LCD")),
        description: Set(Some("A product for testing".into())),
        category: Set(Some("lcd".into())),
        brand: Set(None),
        image_url: Set(None),
        price: Set(price),
        stock: Set(stock),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}

pub async fn create_rental_item(
    state: &AppState,
    price_per_day: i64,
    stock: i32,
) -> anyhow::Result<rental_items::Model> {
    let item = RentalActive {
        id: Set(Uuid::new_v4()),
        name: Set(unique("Solder")),
        description: Set(None),
        category: Set(Some("tools".into())),
        image_url: Set(None),
        price_per_day: Set(price_per_day),
        stock: Set(stock),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(item)
}
