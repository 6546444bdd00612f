use anyhow::Context;
use axum::async_trait;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::query::{OfferFilter, OfferQuery};
use super::repo_types::{NewOffer, Offer, OfferOwnerRow, OfferPage, OfferPatch, OfferRow, OfferWithOwner};

#[async_trait]
pub trait OfferStore: Send + Sync {
    /// Filtered, sorted page plus the count of everything the filter matches.
    async fn search(&self, query: &OfferQuery) -> anyhow::Result<OfferPage>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<OfferWithOwner>>;
    async fn create(&self, new: NewOffer) -> anyhow::Result<Offer>;
    /// `None` when no offer has this id.
    async fn update(&self, id: Uuid, patch: OfferPatch) -> anyhow::Result<Option<Offer>>;
    /// The removed offer, or `None` when no offer has this id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Offer>>;
}

const OFFER_COLUMNS: &str = "o.id, o.product_name, o.product_description, o.product_price, \
     o.product_details, o.product_image, o.product_pictures, o.owner, o.created_at";

pub struct PgOfferStore {
    db: PgPool,
}

impl PgOfferStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &OfferFilter) {
    qb.push(" WHERE TRUE");
    if let Some(title) = &filter.title {
        // strpos matches the text literally, so `%`, `_` and regex syntax are inert.
        qb.push(" AND strpos(lower(o.product_name), lower(")
            .push_bind(title.clone())
            .push(")) > 0");
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND o.product_price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND o.product_price <= ").push_bind(max);
    }
}

#[async_trait]
impl OfferStore for PgOfferStore {
    async fn search(&self, query: &OfferQuery) -> anyhow::Result<OfferPage> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .context("set isolation level")?;

        let mut count_q = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM offers o");
        push_filter(&mut count_q, &query.filter);
        let count: i64 = count_q
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .context("count offers")?;

        let mut page_q = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM offers o", OFFER_COLUMNS));
        push_filter(&mut page_q, &query.filter);
        page_q
            .push(" ORDER BY o.product_price ")
            .push(query.sort.as_sql())
            .push(", o.id ASC LIMIT ")
            .push_bind(query.window.limit)
            .push(" OFFSET ")
            .push_bind(query.window.skip);
        let rows = page_q
            .build_query_as::<OfferRow>()
            .fetch_all(&mut *tx)
            .await
            .context("list offers")?;

        tx.commit().await.context("commit tx")?;

        Ok(OfferPage {
            count,
            offers: rows.into_iter().map(Offer::from).collect(),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<OfferWithOwner>> {
        let row = sqlx::query_as::<_, OfferOwnerRow>(&format!(
            r#"
            SELECT {}, u.username AS owner_username
              FROM offers o
              LEFT JOIN users u ON u.id = o.owner
             WHERE o.id = $1
            "#,
            OFFER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get offer by id")?;

        Ok(row.map(OfferWithOwner::from))
    }

    async fn create(&self, new: NewOffer) -> anyhow::Result<Offer> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r#"
            INSERT INTO offers AS o (id, product_name, product_description, product_price,
                                     product_details, product_image, owner)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            OFFER_COLUMNS
        ))
        .bind(new.id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(Json(&new.details))
        .bind(Json(&new.image))
        .bind(new.owner)
        .fetch_one(&self.db)
        .await
        .context("insert offer")?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, patch: OfferPatch) -> anyhow::Result<Option<Offer>> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r#"
            UPDATE offers AS o
               SET product_name        = COALESCE($2, o.product_name),
                   product_description = COALESCE($3, o.product_description),
                   product_price       = COALESCE($4, o.product_price),
                   product_details     = COALESCE($5, o.product_details)
             WHERE o.id = $1
            RETURNING {}
            "#,
            OFFER_COLUMNS
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.details.map(Json))
        .fetch_optional(&self.db)
        .await
        .context("update offer")?;

        Ok(row.map(Offer::from))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Offer>> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            "DELETE FROM offers AS o WHERE o.id = $1 RETURNING {}",
            OFFER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete offer")?;

        Ok(row.map(Offer::from))
    }
}
