use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{catalog::MitraDetail, mitra::MitraProfileRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    response::{ApiResponse, Created, with_status},
    services::mitra_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}

#[utoipa::path(
    get,
    path = "/api/mitra/profile",
    responses(
        (status = 200, description = "Caller's storefront", body = ApiResponse<MitraDetail>),
        (status = 401, description = "Caller is not a mitra"),
        (status = 404, description = "No profile yet")
    ),
    tag = "Mitra"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MitraDetail>>> {
    let resp = mitra_service::get_profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/mitra/profile",
    request_body = MitraProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<MitraDetail>),
        (status = 200, description = "Profile replaced", body = ApiResponse<MitraDetail>),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Caller is not a mitra")
    ),
    tag = "Mitra"
)]
pub async fn put_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<MitraProfileRequest>,
) -> AppResult<Created<MitraDetail>> {
    let (created, resp) = mitra_service::put_profile(&state, &user, payload).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok(with_status(status, resp))
}
