use anyhow::Context;
use axum::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User, UserRow};
use crate::db::unique_violation;
use crate::error::{AppError, AppResult};

pub const DUPLICATE_EMAIL: &str = "This email is already used";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. A taken email is reported as `AppError::Conflict` by
    /// the store itself, atomically with the insert.
    async fn create(&self, new: NewUser) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Resolves a bearer token to the id of its owner.
    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<Uuid>>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
}

const USER_COLUMNS: &str = "id, email, username, avatar, newsletter, token, salt, hash";

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new: NewUser) -> AppResult<User> {
        let res = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, username, avatar, newsletter, token, salt, hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(new.id)
        .bind(&new.email)
        .bind(&new.account.username)
        .bind(Json(&new.account.avatar))
        .bind(new.newsletter)
        .bind(&new.token)
        .bind(&new.salt)
        .bind(&new.hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(row) => Ok(row.into()),
            Err(e) if unique_violation(&e) == Some("users_email_key") => {
                Err(AppError::Conflict(DUPLICATE_EMAIL.into()))
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(row.map(User::from))
    }

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.db)
            .await
            .context("find user by token")?;
        Ok(id)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
