use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use regex::Regex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::dto::SignupRequest;
use crate::auth::repo_types::{Account, NewUser, User};
use crate::error::{AppError, AppResult};
use crate::images::services::{discard_image, upload_image, UploadItem};
use crate::state::AppState;

pub const TOKEN_LEN: usize = 64;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Opaque bearer credential, issued once at signup.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).as_str().to_string()
}

/// Argon2 hash of `plain` under the caller-supplied per-user salt.
pub fn hash_password(plain: &str, salt: &str) -> anyhow::Result<String> {
    let salt = SaltString::from_b64(salt).map_err(|e| {
        error!(error = %e, "invalid password salt");
        anyhow::anyhow!(e.to_string())
    })?;
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Constant-time check of `plain` against a stored hash. The stored hash must
/// have been produced with the stored salt.
pub fn verify_password(plain: &str, salt: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    match parsed.salt {
        Some(s) if s.as_str() == salt => {}
        _ => anyhow::bail!("stored hash does not match stored salt"),
    }
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Uploads the avatar, then inserts the user. The email uniqueness check is
/// the store's unique constraint; on any insert failure the avatar is removed.
pub async fn signup(st: &AppState, req: SignupRequest, avatar: UploadItem) -> AppResult<User> {
    let user_id = Uuid::new_v4();
    let salt = generate_salt();
    let hash = hash_password(&req.password, &salt)?;
    let avatar = upload_image(st, &format!("users/{}", user_id), avatar).await?;

    let new = NewUser {
        id: user_id,
        email: req.email,
        account: Account {
            username: req.username,
            avatar: avatar.clone(),
        },
        newsletter: req.newsletter,
        token: generate_token(),
        salt,
        hash,
    };

    match st.users.create(new).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user signed up");
            Ok(user)
        }
        Err(e) => {
            if let AppError::Conflict(_) = e {
                warn!(%user_id, "email already registered");
            }
            discard_image(st, &avatar).await;
            Err(e)
        }
    }
}

/// Unknown email and wrong password fail identically.
pub async fn login(st: &AppState, email: &str, password: &str) -> AppResult<User> {
    let user = match st.users.find_by_email(email).await? {
        Some(u) => u,
        None => {
            warn!(%email, "login unknown email");
            return Err(AppError::invalid_credentials());
        }
    };

    if !verify_password(password, &user.salt, &user.hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::invalid_credentials());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
