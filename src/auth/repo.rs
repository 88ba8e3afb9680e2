use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

/// User record. Email matching is exact (case-sensitive) and unique at the
/// storage layer; the hash never serializes out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, mobile, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user. The unique index on email is the authoritative
    /// duplicate guard; two concurrent signups can both pass the handler's
    /// pre-check, and the loser of the insert race lands here.
    pub async fn create(
        db: &PgPool,
        name: &str,
        mobile: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, mobile, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, mobile, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(mobile)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }
}

/// Postgres error class 23505: unique_violation.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Vasu".into(),
            mobile: "9876543210".into(),
            email: "vasu@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let value = serde_json::to_value(&user).expect("serialize");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "vasu@example.com");
        assert_eq!(value["name"], "Vasu");
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
