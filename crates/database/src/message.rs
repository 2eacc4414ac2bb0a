//! Append-only message log, ordered per conversation.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Message, SenderRole};
use crate::validation;

/// Append a message to a conversation.
///
/// The message insert and the bump of the conversation's `updated_at` run
/// in one transaction and share one server-assigned timestamp, so a
/// concurrent reader never sees a new message paired with a stale
/// last-activity time. Validation happens before any write; an unknown
/// conversation rolls back with `NotFound`.
pub async fn append(
    pool: &SqlitePool,
    conversation_id: i64,
    sender: SenderRole,
    content: &str,
    image: Option<&str>,
) -> Result<Message> {
    let content = content.trim();
    let image = image.map(str::trim).filter(|s| !s.is_empty());
    validation::validate_message_body(content, image)?;

    let now = crate::now();
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE conversations
        SET updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&now)
    .bind(conversation_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: conversation_id.to_string(),
        });
    }

    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (conversation_id, sender_type, content, image, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, conversation_id, sender_type, content, image, created_at
        "#,
    )
    .bind(conversation_id)
    .bind(sender)
    .bind(content)
    .bind(image)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        conversation_id,
        message_id = message.id,
        sender = ?sender,
        "Message appended"
    );

    Ok(message)
}

/// List a conversation's messages in transcript order.
///
/// Ascending creation time, with the insertion id as tie-break so equal
/// timestamps still order deterministically.
pub async fn list(pool: &SqlitePool, conversation_id: i64) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, sender_type, content, image, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{conversation, Database};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_append_rejects_empty_body() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "c").await.unwrap();

        let result = append(db.pool(), conv.id, SenderRole::Customer, "  ", Some("")).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(
                crate::ValidationError::EmptyMessage
            ))
        ));

        // No row was written and last-activity is untouched
        assert!(list(db.pool(), conv.id).await.unwrap().is_empty());
        let after = conversation::get(db.pool(), conv.id).await.unwrap();
        assert_eq!(after.updated_at, conv.updated_at);
    }

    #[tokio::test]
    async fn test_append_accepts_image_only() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "c").await.unwrap();

        let msg = append(
            db.pool(),
            conv.id,
            SenderRole::Customer,
            "",
            Some("/media/uploads/a.jpg"),
        )
        .await
        .unwrap();
        assert_eq!(msg.content, "");
        assert_eq!(msg.image.as_deref(), Some("/media/uploads/a.jpg"));
    }

    #[tokio::test]
    async fn test_append_bumps_conversation_updated_at() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "c").await.unwrap();

        let msg = append(db.pool(), conv.id, SenderRole::Customer, "hi", None)
            .await
            .unwrap();

        let after = conversation::get(db.pool(), conv.id).await.unwrap();
        assert_eq!(after.updated_at, msg.created_at);
    }

    #[tokio::test]
    async fn test_append_to_unknown_conversation() {
        let db = test_db().await;

        let result = append(db.pool(), 404, SenderRole::Staff, "hi", None).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_returns_transcript_order() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "c").await.unwrap();

        append(db.pool(), conv.id, SenderRole::Customer, "one", None)
            .await
            .unwrap();
        append(db.pool(), conv.id, SenderRole::Staff, "two", None)
            .await
            .unwrap();
        append(db.pool(), conv.id, SenderRole::Customer, "three", None)
            .await
            .unwrap();

        let messages = list(db.pool(), conv.id).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert!(messages.windows(2).all(|w| w[0].id < w[1].id));

        // Stable across repeated calls
        let again = list(db.pool(), conv.id).await.unwrap();
        assert_eq!(messages, again);
    }

    #[tokio::test]
    async fn test_equal_timestamps_order_by_id() {
        let db = test_db().await;
        let conv = conversation::get_or_create(db.pool(), 1, "c").await.unwrap();

        // Force a timestamp collision
        let ts = crate::now();
        for content in ["first", "second"] {
            sqlx::query(
                "INSERT INTO messages (conversation_id, sender_type, content, created_at) \
                 VALUES (?, 'customer', ?, ?)",
            )
            .bind(conv.id)
            .bind(content)
            .bind(&ts)
            .execute(db.pool())
            .await
            .unwrap();
        }

        let messages = list(db.pool(), conv.id).await.unwrap();
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }
}
