use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::{MitraStatus, UserRole},
    models::User,
};

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    /// CUSTOMER (default) or MITRA.
    pub role: Option<UserRole>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionInfo {
    pub user_id: String,
    pub role: UserRole,
    pub mitra_status: Option<MitraStatus>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub mitra_status: Option<MitraStatus>,
    pub exp: usize,
}
