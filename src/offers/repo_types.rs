use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::images::StoredAsset;

/// One `key: value` line of an offer's details (brand, size, condition, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Offer {
    pub id: Uuid,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    pub product_details: Vec<ProductDetail>,
    pub product_image: Option<StoredAsset>,
    pub product_pictures: Vec<StoredAsset>,
    pub owner: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct OfferRow {
    pub id: Uuid,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    pub product_details: Json<Vec<ProductDetail>>,
    pub product_image: Option<Json<StoredAsset>>,
    pub product_pictures: Json<Vec<StoredAsset>>,
    pub owner: Uuid,
    pub created_at: OffsetDateTime,
}

impl From<OfferRow> for Offer {
    fn from(r: OfferRow) -> Self {
        Self {
            id: r.id,
            product_name: r.product_name,
            product_description: r.product_description,
            product_price: r.product_price,
            product_details: r.product_details.0,
            product_image: r.product_image.map(|j| j.0),
            product_pictures: r.product_pictures.0,
            owner: r.owner,
            created_at: r.created_at,
        }
    }
}

/// Offer joined with the owner's username.
#[derive(Debug, FromRow)]
pub struct OfferOwnerRow {
    #[sqlx(flatten)]
    pub offer: OfferRow,
    pub owner_username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OfferWithOwner {
    pub offer: Offer,
    pub owner_username: Option<String>,
}

impl From<OfferOwnerRow> for OfferWithOwner {
    fn from(r: OfferOwnerRow) -> Self {
        Self {
            offer: r.offer.into(),
            owner_username: r.owner_username,
        }
    }
}

/// A fully validated offer ready to be inserted, image already uploaded.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub details: Vec<ProductDetail>,
    pub image: StoredAsset,
    pub owner: Uuid,
}

/// Fields the update path may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct OfferPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub details: Option<Vec<ProductDetail>>,
}

/// A page of offers plus the total number matching the same filter.
#[derive(Debug, Clone)]
pub struct OfferPage {
    pub count: i64,
    pub offers: Vec<Offer>,
}
