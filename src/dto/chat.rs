use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ChatMessage, ChatRoom},
};

pub const MAX_MEDIA_BYTES: i64 = 10 * 1024 * 1024;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub technician_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub content: Option<String>,
    /// Reference to an already uploaded file.
    pub media_url: Option<String>,
    /// Size of the referenced file in bytes, at most 10 MiB.
    pub media_size: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub media: Option<(String, i64)>,
}

impl SendMessageRequest {
    pub fn validate(self) -> AppResult<OutgoingMessage> {
        let content = self
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let media_url = self
            .media_url
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let media = match media_url {
            Some(url) => {
                let size = self
                    .media_size
                    .ok_or_else(|| AppError::validation("media_size is required with media_url"))?;
                if !(0..=MAX_MEDIA_BYTES).contains(&size) {
                    return Err(AppError::validation("media must be at most 10MB"));
                }
                Some((url, size))
            }
            None => None,
        };

        if content.is_none() && media.is_none() {
            return Err(AppError::validation("content or media is required"));
        }
        Ok(OutgoingMessage { content, media })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomList {
    pub items: Vec<ChatRoom>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageList {
    pub items: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkReadResult {
    pub updated: u64,
}
