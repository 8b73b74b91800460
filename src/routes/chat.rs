use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::chat::{CreateRoomRequest, MarkReadResult, MessageList, RoomList, SendMessageRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::{ChatMessage, ChatRoom},
    response::{ApiResponse, Created, with_status},
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms).post(open_room))
        .route(
            "/rooms/{room_id}/messages",
            get(list_messages).post(send_message).patch(mark_read),
        )
}

#[utoipa::path(
    post,
    path = "/api/chat/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room for caller and technician", body = ApiResponse<ChatRoom>),
        (status = 404, description = "Technician not found")
    ),
    tag = "Chat"
)]
pub async fn open_room(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateRoomRequest>,
) -> AppResult<Json<ApiResponse<ChatRoom>>> {
    let resp = chat_service::open_room(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/chat/rooms",
    responses((status = 200, description = "Caller's rooms, latest activity first", body = ApiResponse<RoomList>)),
    tag = "Chat"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RoomList>>> {
    let resp = chat_service::list_rooms(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/chat/rooms/{room_id}/messages",
    params(("room_id" = Uuid, Path, description = "Room id")),
    responses(
        (status = 200, description = "Messages, oldest first", body = ApiResponse<MessageList>),
        (status = 403, description = "Not a member")
    ),
    tag = "Chat"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = chat_service::list_messages(&state, &user, room_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chat/rooms/{room_id}/messages",
    params(("room_id" = Uuid, Path, description = "Room id")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<ChatMessage>),
        (status = 400, description = "Empty message or media over 10MB"),
        (status = 403, description = "Not a member")
    ),
    tag = "Chat"
)]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(room_id): Path<Uuid>,
    AppJson(payload): AppJson<SendMessageRequest>,
) -> AppResult<Created<ChatMessage>> {
    let resp = chat_service::send_message(&state, &user, room_id, payload).await?;
    Ok(with_status(StatusCode::CREATED, resp))
}

#[utoipa::path(
    patch,
    path = "/api/chat/rooms/{room_id}/messages",
    params(("room_id" = Uuid, Path, description = "Room id")),
    responses(
        (status = 200, description = "Incoming messages marked read", body = ApiResponse<MarkReadResult>),
        (status = 403, description = "Not a member")
    ),
    tag = "Chat"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MarkReadResult>>> {
    let resp = chat_service::mark_read(&state, &user, room_id).await?;
    Ok(Json(resp))
}
