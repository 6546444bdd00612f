use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::offers::repo::{OfferStore, PgOfferStore};
use crate::storage::{ImageHost, S3ImageHost};

/// Collaborators shared by every request. Built once at startup and handed to
/// the router; nothing here is a global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub offers: Arc<dyn OfferStore>,
    pub users: Arc<dyn UserStore>,
    pub images: Arc<dyn ImageHost>,
}

impl AppState {
    pub async fn init(config: Arc<AppConfig>, db: PgPool) -> anyhow::Result<Self> {
        let images = Arc::new(S3ImageHost::new(&config.images).await?) as Arc<dyn ImageHost>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgOfferStore::new(db.clone())),
            Arc::new(PgUserStore::new(db)),
            images,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        offers: Arc<dyn OfferStore>,
        users: Arc<dyn UserStore>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            config,
            offers,
            users,
            images,
        }
    }
}
