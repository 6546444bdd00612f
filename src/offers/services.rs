use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::dto::PublishOfferRequest;
use super::repo_types::{NewOffer, Offer, ProductDetail};
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::images::services::{discard_image, upload_image, UploadItem};
use crate::state::AppState;

/// Field names accepted for the offer picture.
pub const PICTURE_FIELDS: &[&str] = &["picture", "pic"];

impl PublishOfferRequest {
    /// `title`, `description` and `price` are named fields; every other text
    /// field becomes a detail entry, in the order it was sent.
    pub fn from_form(form: &mut FormData) -> AppResult<Self> {
        let title = form
            .take("title")
            .ok_or_else(|| AppError::validation("title is required"))?;
        let description = form.take("description").unwrap_or_default();
        let price = form
            .take("price")
            .ok_or_else(|| AppError::validation("price is required"))?;
        let price = match price.trim().parse::<f64>() {
            Ok(p) if p.is_finite() => p,
            _ => return Err(AppError::validation("price must be a number")),
        };
        let details = form
            .fields
            .drain(..)
            .map(|(key, value)| ProductDetail { key, value })
            .collect();

        let req = Self {
            title: title.trim().to_string(),
            description,
            price,
            details,
        };
        req.validate()?;
        Ok(req)
    }
}

/// Uploads the picture first, then writes the offer with the picture already
/// attached. A failed insert removes the uploaded picture again, so an offer
/// row never exists without its image.
pub async fn publish_offer(
    st: &AppState,
    owner: Uuid,
    req: PublishOfferRequest,
    picture: UploadItem,
) -> AppResult<Offer> {
    let offer_id = Uuid::new_v4();
    let image = upload_image(st, &format!("offers/{}", offer_id), picture).await?;

    let new = NewOffer {
        id: offer_id,
        name: req.title,
        description: req.description,
        price: req.price,
        details: req.details,
        image: image.clone(),
        owner,
    };

    match st.offers.create(new).await {
        Ok(offer) => {
            info!(offer_id = %offer.id, %owner, "offer published");
            Ok(offer)
        }
        Err(e) => {
            warn!(error = %e, %offer_id, "offer insert failed; removing uploaded picture");
            discard_image(st, &image).await;
            Err(e.into())
        }
    }
}
