//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A customer-support conversation. Exactly one exists per customer;
/// `user_id` carries a UNIQUE constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning customer's user ID.
    pub user_id: i64,
    /// Display name shown to staff (placeholder until the customer is known).
    pub customer_name: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last-activity timestamp, bumped on every message in either direction.
    pub updated_at: String,
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SenderRole {
    Customer,
    Staff,
}

/// One utterance inside a conversation. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Auto-incrementing ID; also the tie-break for transcript order.
    pub id: i64,
    /// Owning conversation.
    pub conversation_id: i64,
    /// Sender attribution.
    pub sender_type: SenderRole,
    /// Text content (may be empty when an image is attached).
    pub content: String,
    /// Image URL or path, if any.
    pub image: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Staff-facing list-view row, recomputed from the message log on every
/// read. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    /// Conversation ID.
    pub id: i64,
    /// Customer display name.
    pub customer_name: String,
    /// Latest message content, truncated to 80 characters.
    pub last_message: String,
    /// Latest message timestamp, or the conversation's `updated_at` when
    /// there are no messages yet.
    pub last_message_time: String,
    /// True when the latest message came from the customer and staff has
    /// not yet replied.
    pub has_new_message: bool,
}

/// A registered user. The phone number doubles as the login name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Phone number, unique.
    pub phone: String,
    /// Salted password hash (`salt$hex`).
    pub password_hash: String,
    /// Staff capability flag.
    pub is_staff: bool,
    /// Disabled accounts cannot log in or use their sessions.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// The resolved caller behind a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Identity {
    /// User ID.
    pub user_id: i64,
    /// Phone number.
    pub phone: String,
    /// Staff capability flag.
    pub is_staff: bool,
}
