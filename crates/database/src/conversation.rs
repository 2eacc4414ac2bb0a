//! Conversation registry: one support conversation per customer.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Conversation;

/// Display name used until the customer's real name is known.
pub const DEFAULT_CUSTOMER_NAME: &str = "客户";

/// Find the conversation owned by `user_id`, creating it if absent.
///
/// Safe under concurrent first contact: `user_id` is UNIQUE and the insert
/// is `ON CONFLICT DO NOTHING`, so racing callers collapse onto one row and
/// both fetch the same conversation. An existing row with an empty display
/// name is backfilled from the hint.
pub async fn get_or_create(
    pool: &SqlitePool,
    user_id: i64,
    display_name_hint: &str,
) -> Result<Conversation> {
    let name = match display_name_hint.trim() {
        "" => DEFAULT_CUSTOMER_NAME,
        hint => hint,
    };
    let now = crate::now();

    sqlx::query(
        r#"
        INSERT INTO conversations (user_id, customer_name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, customer_name, created_at, updated_at
        FROM conversations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if conversation.customer_name.is_empty() {
        sqlx::query(
            r#"
            UPDATE conversations
            SET customer_name = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(conversation.id)
        .execute(pool)
        .await?;

        return Ok(Conversation {
            customer_name: name.to_string(),
            ..conversation
        });
    }

    Ok(conversation)
}

/// Get a conversation by ID.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, customer_name, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Conversation",
        id: id.to_string(),
    })
}

/// Get the conversation owned by `user_id`, if one exists. Does not create.
pub async fn get_by_user(pool: &SqlitePool, user_id: i64) -> Result<Option<Conversation>> {
    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, customer_name, created_at, updated_at
        FROM conversations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(conversation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let db = test_db().await;

        let first = get_or_create(db.pool(), 42, "alice").await.unwrap();
        let second = get_or_create(db.pool(), 42, "alice").await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE user_id = 42")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_empty_hint_gets_placeholder_name() {
        let db = test_db().await;

        let conv = get_or_create(db.pool(), 7, "  ").await.unwrap();
        assert_eq!(conv.customer_name, DEFAULT_CUSTOMER_NAME);
    }

    #[tokio::test]
    async fn test_backfills_empty_display_name() {
        let db = test_db().await;

        let now = crate::now();
        sqlx::query(
            "INSERT INTO conversations (user_id, customer_name, created_at, updated_at) \
             VALUES (9, '', ?, ?)",
        )
        .bind(&now)
        .bind(&now)
        .execute(db.pool())
        .await
        .unwrap();

        let conv = get_or_create(db.pool(), 9, "bob").await.unwrap();
        assert_eq!(conv.customer_name, "bob");

        let stored = get(db.pool(), conv.id).await.unwrap();
        assert_eq!(stored.customer_name, "bob");
    }

    #[tokio::test]
    async fn test_get_unknown_conversation() {
        let db = test_db().await;

        let result = get(db.pool(), 999).await;
        assert!(matches!(
            result,
            Err(crate::DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_by_user_does_not_create() {
        let db = test_db().await;

        assert!(get_by_user(db.pool(), 5).await.unwrap().is_none());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
