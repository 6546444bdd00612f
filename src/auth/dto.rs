use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::repo_types::{Account, User};
use crate::auth::services::is_valid_email;
use crate::error::{AppError, AppResult};
use crate::form::FormData;

/// Text part of the signup form; the avatar travels separately.
#[derive(Debug, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1 to 50 characters"))]
    pub username: String,
    pub email: String,
    #[validate(length(min = 8, message = "Password too short"))]
    pub password: String,
    pub newsletter: bool,
}

impl SignupRequest {
    pub fn from_form(form: &mut FormData) -> AppResult<Self> {
        let username = form
            .take("username")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::validation("username is required"))?;
        let email = form
            .take("email")
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_default();
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email"));
        }
        let password = form.take("password").unwrap_or_default();
        let newsletter = match form.take("newsletter").as_deref().map(str::trim) {
            None | Some("") | Some("false") | Some("0") | Some("off") => false,
            Some("true") | Some("1") | Some("on") => true,
            Some(_) => return Err(AppError::validation("newsletter must be a boolean")),
        };

        let req = Self {
            username,
            email,
            password,
            newsletter,
        };
        req.validate()?;
        Ok(req)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: Uuid,
    pub account: Account,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub token: String,
    pub account: Account,
}

/// What `GET /users` exposes per user.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub account: Account,
    pub newsletter: bool,
}

impl From<User> for SignupResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            account: u.account,
            token: u.token,
        }
    }
}

impl From<User> for LoginResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            token: u.token,
            account: u.account,
        }
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            account: u.account,
            newsletter: u.newsletter,
        }
    }
}
