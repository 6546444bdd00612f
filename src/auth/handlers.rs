use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest, SignupResponse},
        services::{login as login_user, signup as signup_user},
    },
    error::{AppError, AppResult},
    form::FormData,
    state::AppState,
    validation::ValidatedJson,
};

pub fn auth_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(signup).layer(DefaultBodyLimit::max(max_upload_bytes)))
        .route("/user/login", post(login))
}

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// POST /user/signup (multipart): username, email, password, newsletter, avatar.
#[instrument(skip(state, mp))]
pub async fn signup(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SignupResponse>> {
    let mut form = FormData::read(mp?, &["avatar"]).await?;
    let avatar = form
        .file
        .take()
        .ok_or_else(|| AppError::validation("avatar is required"))?;
    let req = SignupRequest::from_form(&mut form)?;

    let user = signup_user(&state, req, avatar).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();
    let user = login_user(&state, &email, &payload.password).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<PublicUser>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}
