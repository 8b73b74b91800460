use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, OnConflict};
use uuid::Uuid;

use crate::{
    dto::chat::{CreateRoomRequest, MarkReadResult, MessageList, RoomList, SendMessageRequest},
    entity::{
        chat_messages::{self, ActiveModel as MessageActive, Entity as ChatMessages},
        chat_rooms::{self, ActiveModel as RoomActive, Entity as ChatRooms},
        technicians::Entity as Technicians,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ChatMessage, ChatRoom},
    response::{ApiResponse, Meta},
    services::technician_service::technician_of,
    state::AppState,
};

/// Loads the room and checks the caller is its customer or its technician.
async fn member_room<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    room_id: Uuid,
) -> AppResult<chat_rooms::Model> {
    let room = ChatRooms::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Chat room"))?;
    if room.customer_id == user.user_id {
        return Ok(room);
    }
    let is_technician = technician_of(db, user.user_id)
        .await?
        .is_some_and(|tech| tech.id == room.technician_id);
    if !is_technician {
        return Err(AppError::Forbidden("You are not a member of this chat".into()));
    }
    Ok(room)
}

/// Returns the room for (caller, technician), creating it on first use.
pub async fn open_room(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRoomRequest,
) -> AppResult<ApiResponse<ChatRoom>> {
    let technician = Technicians::find_by_id(payload.technician_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Technician"))?;
    if technician.user_id == user.user_id {
        return Err(AppError::validation("technician_id must not be your own profile"));
    }

    let room = RoomActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        technician_id: Set(technician.id),
        last_message_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    ChatRooms::insert(room)
        .on_conflict(
            OnConflict::columns([chat_rooms::Column::CustomerId, chat_rooms::Column::TechnicianId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.orm)
        .await?;

    let room = ChatRooms::find()
        .filter(chat_rooms::Column::CustomerId.eq(user.user_id))
        .filter(chat_rooms::Column::TechnicianId.eq(technician.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("chat room vanished after upsert")))?;

    Ok(ApiResponse::success("Chat room", ChatRoom::from(room), Some(Meta::empty())))
}

pub async fn list_rooms(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<RoomList>> {
    let mut condition = Condition::any().add(chat_rooms::Column::CustomerId.eq(user.user_id));
    if let Some(technician) = technician_of(&state.orm, user.user_id).await? {
        condition = condition.add(chat_rooms::Column::TechnicianId.eq(technician.id));
    }

    let items = ChatRooms::find()
        .filter(condition)
        .order_by_desc(Expr::col(chat_rooms::Column::LastMessageAt).if_null(Expr::col(chat_rooms::Column::CreatedAt)))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ChatRoom::from)
        .collect();

    Ok(ApiResponse::success("Chat rooms", RoomList { items }, Some(Meta::empty())))
}

pub async fn list_messages(
    state: &AppState,
    user: &AuthUser,
    room_id: Uuid,
) -> AppResult<ApiResponse<MessageList>> {
    let room = member_room(&state.orm, user, room_id).await?;
    let items = ChatMessages::find()
        .filter(chat_messages::Column::RoomId.eq(room.id))
        .order_by_asc(chat_messages::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ChatMessage::from)
        .collect();
    Ok(ApiResponse::success("Messages", MessageList { items }, Some(Meta::empty())))
}

/// Appends a message and bumps the room's `last_message_at` in one transaction.
pub async fn send_message(
    state: &AppState,
    user: &AuthUser,
    room_id: Uuid,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<ChatMessage>> {
    let outgoing = payload.validate()?;

    let txn = state.orm.begin().await?;
    let room = member_room(&txn, user, room_id).await?;

    let now = Utc::now();
    let (media_url, media_size) = match outgoing.media {
        Some((url, size)) => (Some(url), Some(size)),
        None => (None, None),
    };
    let message = MessageActive {
        id: Set(Uuid::new_v4()),
        room_id: Set(room.id),
        sender_id: Set(user.user_id),
        content: Set(outgoing.content),
        media_url: Set(media_url),
        media_size: Set(media_size),
        is_read: Set(false),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut room: RoomActive = room.into();
    room.last_message_at = Set(Some(now.into()));
    room.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Message sent",
        ChatMessage::from(message),
        Some(Meta::empty()),
    ))
}

/// Marks every message in the room not sent by the caller as read.
pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    room_id: Uuid,
) -> AppResult<ApiResponse<MarkReadResult>> {
    let room = member_room(&state.orm, user, room_id).await?;
    let result = ChatMessages::update_many()
        .col_expr(chat_messages::Column::IsRead, Expr::value(true))
        .filter(chat_messages::Column::RoomId.eq(room.id))
        .filter(chat_messages::Column::SenderId.ne(user.user_id))
        .filter(chat_messages::Column::IsRead.eq(false))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Messages marked as read",
        MarkReadResult {
            updated: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}
