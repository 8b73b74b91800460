use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, SessionInfo},
    entity::{
        MitraStatus, UserRole,
        users::{self, ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::{AppState, SessionKeys},
};

const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn sign_session(
    keys: &SessionKeys,
    user_id: Uuid,
    role: UserRole,
    mitra_status: Option<MitraStatus>,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(keys.ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        mitra_status,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(keys.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn validate_registration(payload: &RegisterRequest) -> AppResult<UserRole> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("email is invalid"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    match payload.role.unwrap_or(UserRole::Customer) {
        role @ (UserRole::Customer | UserRole::Mitra) => Ok(role),
        _ => Err(AppError::validation("role must be CUSTOMER or MITRA")),
    }
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let role = validate_registration(&payload)?;
    let email = payload.email.trim().to_lowercase();

    let exist = Users::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let mitra_status = (role == UserRole::Mitra).then_some(MitraStatus::Pending);

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(Some(password_hash)),
        name: Set(payload.name.trim().to_string()),
        phone: Set(payload.phone),
        role: Set(role),
        mitra_status: Set(mitra_status),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;

    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user = Users::find()
        .filter(users::Column::Email.eq(email.trim().to_lowercase()))
        .one(&state.orm)
        .await?;

    let invalid = || AppError::BadRequest("Invalid email or password".into());
    let user = user.ok_or_else(invalid)?;
    // OAuth accounts have no local password.
    let stored_hash = user.password_hash.as_deref().ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::BadRequest("Account is inactive".into()));
    }

    let token = sign_session(&state.session, user.id, user.role, user.mitra_status)?;

    audit::record(
        state,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            user: User::from(user),
        },
        Some(Meta::empty()),
    ))
}

pub fn session_info(user: &AuthUser) -> ApiResponse<SessionInfo> {
    ApiResponse::success(
        "Session",
        SessionInfo {
            user_id: user.user_id.to_string(),
            role: user.role,
            mitra_status: user.mitra_status,
        },
        Some(Meta::empty()),
    )
}
