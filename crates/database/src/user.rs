//! User CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Create a new user. The phone number must be unique.
pub async fn create_user(
    pool: &SqlitePool,
    phone: &str,
    password_hash: &str,
    is_staff: bool,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (phone, password_hash, is_staff, is_active, created_at)
        VALUES (?, ?, ?, 1, ?)
        RETURNING id, phone, password_hash, is_staff, is_active, created_at
        "#,
    )
    .bind(phone)
    .bind(password_hash)
    .bind(is_staff)
    .bind(crate::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: phone.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, phone, password_hash, is_staff, is_active, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by phone number, if one exists.
pub async fn get_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, phone, password_hash, is_staff, is_active, created_at
        FROM users
        WHERE phone = ?
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Grant or revoke the staff capability.
pub async fn set_staff(pool: &SqlitePool, id: i64, is_staff: bool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_staff = ?
        WHERE id = ?
        "#,
    )
    .bind(is_staff)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}
