//! Customer support conversations and messages.
//!
//! Staff endpoints triage every conversation; customer endpoints only ever
//! touch the caller's own conversation, which is created lazily on first
//! contact.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use database::models::{ConversationSummary, Message, SenderRole};
use database::{conversation, message, summary, validation};

use crate::error::Result;
use crate::extract::{AuthUser, StaffUser};
use crate::state::AppState;

/// Message send request body.
#[derive(Deserialize)]
pub struct SendMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One transcript entry on the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    pub id: i64,
    pub sender_type: SenderRole,
    pub content: String,
    pub image: String,
    pub created_at: String,
}

impl From<Message> for MessageItem {
    fn from(message: Message) -> Self {
        MessageItem {
            id: message.id,
            sender_type: message.sender_type,
            content: message.content,
            image: message.image.unwrap_or_default(),
            created_at: message.created_at,
        }
    }
}

/// One staff-inbox row on the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub id: i64,
    pub customer_name: String,
    pub last_message: String,
    pub last_message_time: String,
    pub has_new_message: bool,
}

impl From<ConversationSummary> for SummaryItem {
    fn from(summary: ConversationSummary) -> Self {
        SummaryItem {
            id: summary.id,
            customer_name: summary.customer_name,
            last_message: summary.last_message,
            last_message_time: summary.last_message_time,
            has_new_message: summary.has_new_message,
        }
    }
}

#[derive(Serialize)]
pub struct SummariesResponse {
    pub ok: bool,
    pub items: Vec<SummaryItem>,
}

#[derive(Serialize)]
pub struct MessagesResponse {
    pub ok: bool,
    pub items: Vec<MessageItem>,
}

/// Acknowledgement for a sent message.
#[derive(Serialize)]
pub struct SentResponse {
    pub ok: bool,
    pub item: SentItem,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentItem {
    pub id: i64,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub ok: bool,
    pub conversation: ConversationRef,
}

#[derive(Serialize)]
pub struct ConversationRef {
    pub id: i64,
}

/// Staff: list all conversations, most recent activity first.
pub async fn staff_conversations(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> Result<Json<SummariesResponse>> {
    let items = summary::list_summaries(state.db.pool())
        .await?
        .into_iter()
        .map(SummaryItem::from)
        .collect();
    Ok(Json(SummariesResponse { ok: true, items }))
}

/// Staff: full transcript of one conversation.
pub async fn staff_messages(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(conversation_id): Path<i64>,
) -> Result<Json<MessagesResponse>> {
    let conv = conversation::get(state.db.pool(), conversation_id).await?;
    let items = message::list(state.db.pool(), conv.id)
        .await?
        .into_iter()
        .map(MessageItem::from)
        .collect();
    Ok(Json(MessagesResponse { ok: true, items }))
}

/// Staff: reply into a conversation.
pub async fn staff_send(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(conversation_id): Path<i64>,
    body: std::result::Result<Json<SendMessage>, JsonRejection>,
) -> Result<Json<SentResponse>> {
    let body = super::parse_body(body)?;
    let conv = conversation::get(state.db.pool(), conversation_id).await?;
    let message = message::append(
        state.db.pool(),
        conv.id,
        SenderRole::Staff,
        &body.content,
        body.image.as_deref(),
    )
    .await?;
    Ok(Json(SentResponse {
        ok: true,
        item: SentItem {
            id: message.id,
            created_at: message.created_at,
        },
    }))
}

/// Customer: my conversation, created on first sight.
pub async fn my_conversation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ConversationResponse>> {
    let conv =
        conversation::get_or_create(state.db.pool(), identity.user_id, &identity.phone).await?;
    Ok(Json(ConversationResponse {
        ok: true,
        conversation: ConversationRef { id: conv.id },
    }))
}

/// Customer: my transcript; empty when no conversation exists yet.
pub async fn my_messages(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<MessagesResponse>> {
    let items = match conversation::get_by_user(state.db.pool(), identity.user_id).await? {
        Some(conv) => message::list(state.db.pool(), conv.id)
            .await?
            .into_iter()
            .map(MessageItem::from)
            .collect(),
        None => Vec::new(),
    };
    Ok(Json(MessagesResponse { ok: true, items }))
}

/// Customer: send a message, creating the conversation if needed.
pub async fn my_send(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    body: std::result::Result<Json<SendMessage>, JsonRejection>,
) -> Result<Json<SentResponse>> {
    let body = super::parse_body(body)?;
    // Reject an empty body before first contact creates a conversation
    validation::validate_message_body(body.content.trim(), body.image.as_deref().map(str::trim))?;

    let conv =
        conversation::get_or_create(state.db.pool(), identity.user_id, &identity.phone).await?;
    let message = message::append(
        state.db.pool(),
        conv.id,
        SenderRole::Customer,
        &body.content,
        body.image.as_deref(),
    )
    .await?;
    Ok(Json(SentResponse {
        ok: true,
        item: SentItem {
            id: message.id,
            created_at: message.created_at,
        },
    }))
}
