use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::repo_types::{Offer, OfferPatch, OfferWithOwner, ProductDetail};
use crate::images::StoredAsset;

#[derive(Debug, Serialize)]
pub struct OfferListResponse {
    pub count: i64,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Serialize)]
pub struct OwnerAccount {
    pub username: String,
}

/// Public view of an offer's owner; never carries credentials.
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub account: OwnerAccount,
}

#[derive(Debug, Serialize)]
pub struct OfferDetails {
    pub id: Uuid,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    pub product_details: Vec<ProductDetail>,
    pub product_image: Option<StoredAsset>,
    pub product_pictures: Vec<StoredAsset>,
    pub owner: Option<OwnerSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<OfferWithOwner> for OfferDetails {
    fn from(o: OfferWithOwner) -> Self {
        let owner = o.owner_username.map(|username| OwnerSummary {
            id: o.offer.owner,
            account: OwnerAccount { username },
        });
        let offer = o.offer;
        Self {
            id: offer.id,
            product_name: offer.product_name,
            product_description: offer.product_description,
            product_price: offer.product_price,
            product_details: offer.product_details,
            product_image: offer.product_image,
            product_pictures: offer.product_pictures,
            owner,
            created_at: offer.created_at,
        }
    }
}

/// Text part of `POST /offers/publish`; the picture travels separately.
#[derive(Debug, Validate)]
pub struct PublishOfferRequest {
    #[validate(length(min = 1, max = 50, message = "title must be 1 to 50 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, max = 100000.0, message = "price must be between 0 and 100000"))]
    pub price: f64,
    pub details: Vec<ProductDetail>,
}

/// Body of `PUT /offers/:id`. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateOfferRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 50, message = "title must be 1 to 50 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 100000.0, message = "price must be between 0 and 100000"))]
    pub price: Option<f64>,
    pub details: Option<Vec<ProductDetail>>,
}

fn trimmed<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.map(|s| s.trim().to_string()))
}

impl From<UpdateOfferRequest> for OfferPatch {
    fn from(r: UpdateOfferRequest) -> Self {
        Self {
            name: r.title,
            description: r.description,
            price: r.price,
            details: r.details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
