//! Staff-facing conversation list projection.
//!
//! Derived from the message log on every call; nothing here is stored.

use sqlx::{FromRow, SqlitePool};

use crate::models::{ConversationSummary, SenderRole};
use crate::Result;

/// Maximum excerpt length, in characters.
pub const EXCERPT_MAX_CHARS: usize = 80;

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    customer_name: String,
    updated_at: String,
    last_content: Option<String>,
    last_sender: Option<SenderRole>,
    last_created_at: Option<String>,
}

/// List all conversations, most recently active first, each with its latest
/// message excerpt and the unread flag.
///
/// A conversation is flagged unread when its latest message came from the
/// customer; the whole staff pool shares this one flag.
pub async fn list_summaries(pool: &SqlitePool) -> Result<Vec<ConversationSummary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT c.id, c.customer_name, c.updated_at,
               m.content AS last_content,
               m.sender_type AS last_sender,
               m.created_at AS last_created_at
        FROM conversations c
        LEFT JOIN messages m ON m.id = (
            SELECT id FROM messages
            WHERE conversation_id = c.id
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        ORDER BY c.updated_at DESC, c.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ConversationSummary {
            id: row.id,
            customer_name: row.customer_name,
            last_message: excerpt(row.last_content.as_deref().unwrap_or("")),
            last_message_time: row.last_created_at.unwrap_or(row.updated_at),
            has_new_message: row.last_sender == Some(SenderRole::Customer),
        })
        .collect())
}

/// Truncate message content to [`EXCERPT_MAX_CHARS`] characters.
///
/// Counts characters, not bytes, so multibyte content never splits mid
/// code point.
fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((byte_index, _)) => content[..byte_index].to_string(),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{conversation, message, Database};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[test]
    fn test_excerpt_truncates_at_80_chars() {
        let long = "x".repeat(100);
        assert_eq!(excerpt(&long).chars().count(), 80);

        let short = "y".repeat(50);
        assert_eq!(excerpt(&short), short);

        let exact = "z".repeat(80);
        assert_eq!(excerpt(&exact), exact);
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let cjk = "你".repeat(100);
        let cut = excerpt(&cjk);
        assert_eq!(cut.chars().count(), 80);
        assert_eq!(cut, "你".repeat(80));
    }

    #[tokio::test]
    async fn test_empty_conversation_summary() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "alice").await.unwrap();

        let summaries = list_summaries(db.pool()).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, conv.id);
        assert_eq!(summaries[0].customer_name, "alice");
        assert_eq!(summaries[0].last_message, "");
        assert_eq!(summaries[0].last_message_time, conv.updated_at);
        assert!(!summaries[0].has_new_message);
    }

    #[tokio::test]
    async fn test_unread_follows_latest_sender() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "alice").await.unwrap();

        message::append(db.pool(), conv.id, SenderRole::Customer, "help", None)
            .await
            .unwrap();
        let summaries = list_summaries(db.pool()).await.unwrap();
        assert!(summaries[0].has_new_message);

        message::append(db.pool(), conv.id, SenderRole::Staff, "on it", None)
            .await
            .unwrap();
        let summaries = list_summaries(db.pool()).await.unwrap();
        assert!(!summaries[0].has_new_message);

        message::append(db.pool(), conv.id, SenderRole::Customer, "thanks", None)
            .await
            .unwrap();
        let summaries = list_summaries(db.pool()).await.unwrap();
        assert!(summaries[0].has_new_message);
    }

    #[tokio::test]
    async fn test_summaries_order_by_recency() {
        let db = test_db().await;
        let first = conversation::get_or_create(db.pool(), 1, "a").await.unwrap();
        let second = conversation::get_or_create(db.pool(), 2, "b").await.unwrap();

        message::append(db.pool(), second.id, SenderRole::Customer, "newer", None)
            .await
            .unwrap();

        let summaries = list_summaries(db.pool()).await.unwrap();
        assert_eq!(summaries[0].id, second.id);
        assert_eq!(summaries[1].id, first.id);

        // Activity in the older conversation moves it back to the top
        message::append(db.pool(), first.id, SenderRole::Customer, "newest", None)
            .await
            .unwrap();
        let summaries = list_summaries(db.pool()).await.unwrap();
        assert_eq!(summaries[0].id, first.id);
    }

    #[tokio::test]
    async fn test_summary_excerpt_uses_latest_message() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "a").await.unwrap();

        message::append(db.pool(), conv.id, SenderRole::Customer, "older", None)
            .await
            .unwrap();
        let long = "long ".repeat(30);
        message::append(db.pool(), conv.id, SenderRole::Customer, &long, None)
            .await
            .unwrap();

        let summaries = list_summaries(db.pool()).await.unwrap();
        assert_eq!(summaries[0].last_message.chars().count(), 80);
        assert!(long.trim().starts_with(&summaries[0].last_message));
    }
}
