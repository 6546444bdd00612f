use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::QueryRejection,
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::dto::{MessageResponse, OfferDetails, OfferListResponse, PublishOfferRequest, UpdateOfferRequest};
use super::query::{OfferListParams, OfferQuery};
use super::repo_types::Offer;
use super::services::{publish_offer, PICTURE_FIELDS};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    form::FormData,
    images::services::discard_image,
    state::AppState,
    validation::ValidatedJson,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/offers", get(list_offers))
        .route("/offers/:id", get(get_offer).put(update_offer).delete(delete_offer))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/offers/publish", post(publish))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Malformed ids are a client error; only well-formed ids reach the store.
fn parse_offer_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("Invalid offer id"))
}

#[instrument(skip(state))]
pub async fn list_offers(
    State(state): State<AppState>,
    params: Result<Query<OfferListParams>, QueryRejection>,
) -> AppResult<Json<OfferListResponse>> {
    let Query(params) = params?;
    let query = OfferQuery::parse(&params)?;
    let page = state.offers.search(&query).await?;
    debug!(count = page.count, returned = page.offers.len(), skip = query.window.skip, "offers listed");
    Ok(Json(OfferListResponse {
        count: page.count,
        offers: page.offers,
    }))
}

#[instrument(skip(state))]
pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<OfferDetails>> {
    let id = parse_offer_id(&id)?;
    let offer = state
        .offers
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Offer"))?;
    Ok(Json(offer.into()))
}

/// POST /offers/publish (multipart): title, description, price, picture and
/// any number of extra detail fields.
#[instrument(skip(state, mp))]
pub async fn publish(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<Offer>)> {
    let mut form = FormData::read(mp?, PICTURE_FIELDS).await?;
    let picture = form
        .file
        .take()
        .ok_or_else(|| AppError::validation("picture is required"))?;
    let req = PublishOfferRequest::from_form(&mut form)?;

    let offer = publish_offer(&state, user_id, req, picture).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

// No ownership or authentication check on update/delete: any caller may edit
// or remove any offer.
#[instrument(skip(state, body))]
pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateOfferRequest>,
) -> AppResult<Json<Offer>> {
    let id = parse_offer_id(&id)?;
    let offer = state
        .offers
        .update(id, body.into())
        .await?
        .ok_or(AppError::NotFound("Offer"))?;
    info!(offer_id = %id, "offer updated without ownership check");
    Ok(Json(offer))
}

#[instrument(skip(state))]
pub async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_offer_id(&id)?;
    let offer = state
        .offers
        .delete(id)
        .await?
        .ok_or(AppError::NotFound("Offer"))?;
    warn!(offer_id = %id, "offer deleted without ownership check");

    for image in offer.product_image.iter().chain(&offer.product_pictures) {
        discard_image(&state, image).await;
    }
    Ok(Json(MessageResponse {
        message: "Offer successfully deleted",
    }))
}
