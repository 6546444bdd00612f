use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::images::StoredAsset;

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub avatar: StoredAsset,
}

/// User record. `token`, `salt` and `hash` never leave the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub account: Account,
    pub newsletter: bool,
    pub token: String,
    pub salt: String,
    pub hash: String,
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub avatar: Json<StoredAsset>,
    pub newsletter: bool,
    pub token: String,
    pub salt: String,
    pub hash: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            account: Account {
                username: r.username,
                avatar: r.avatar.0,
            },
            newsletter: r.newsletter,
            token: r.token,
            salt: r.salt,
            hash: r.hash,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub account: Account,
    pub newsletter: bool,
    pub token: String,
    pub salt: String,
    pub hash: String,
}
