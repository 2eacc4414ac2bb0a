//! Server-side session storage.
//!
//! A session row maps a bearer token to its user. Tokens are minted by the
//! web layer; this module only stores and resolves them.

use sqlx::SqlitePool;

use crate::models::Identity;
use crate::Result;

/// Store a new session token for a user.
pub async fn create(pool: &SqlitePool, token: &str, user_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(crate::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Resolve a token to the caller behind it.
///
/// Returns `None` for unknown tokens and for sessions whose user has been
/// disabled.
pub async fn identity(pool: &SqlitePool, token: &str) -> Result<Option<Identity>> {
    let identity = sqlx::query_as::<_, Identity>(
        r#"
        SELECT users.id AS user_id, users.phone, users.is_staff
        FROM sessions
        INNER JOIN users ON users.id = sessions.user_id
        WHERE sessions.token = ? AND users.is_active = 1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(identity)
}

/// Delete a session. Deleting an unknown token is not an error.
pub async fn delete(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{user, Database};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let db = test_db().await;
        let user = user::create_user(db.pool(), "13800000000", "salt$hash", true)
            .await
            .unwrap();

        create(db.pool(), "token-1", user.id).await.unwrap();

        let identity = identity(db.pool(), "token-1").await.unwrap().unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.phone, "13800000000");
        assert!(identity.is_staff);
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let db = test_db().await;
        assert!(identity(db.pool(), "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_revokes_session() {
        let db = test_db().await;
        let user = user::create_user(db.pool(), "13800000000", "salt$hash", false)
            .await
            .unwrap();
        create(db.pool(), "token-1", user.id).await.unwrap();

        delete(db.pool(), "token-1").await.unwrap();
        assert!(identity(db.pool(), "token-1").await.unwrap().is_none());

        // Idempotent
        delete(db.pool(), "token-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_disabled_user_session_is_rejected() {
        let db = test_db().await;
        let user = user::create_user(db.pool(), "13800000000", "salt$hash", false)
            .await
            .unwrap();
        create(db.pool(), "token-1", user.id).await.unwrap();

        sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
            .bind(user.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(identity(db.pool(), "token-1").await.unwrap().is_none());
    }
}
