//! Translation of the untrusted `GET /offers` query string into a filter, a
//! sort order and a page window.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const PAGE_SIZE: i64 = 20;

/// Raw query parameters. Everything is kept as a string so that malformed
/// numbers are reported by us as a 400 instead of by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct OfferListParams {
    pub title: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferFilter {
    /// Case-insensitive, unanchored, literal substring of `product_name`.
    pub title: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `price-asc`, `price-desc`, bare `asc`/`desc` and their long or numeric
    /// forms. Anything else, including absence, sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Asc;
        };
        let raw = raw.trim().to_ascii_lowercase();
        let order = raw.strip_prefix("price-").unwrap_or(&raw);
        match order {
            "desc" | "descending" | "-1" => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: i64,
    pub limit: i64,
}

impl PageWindow {
    /// Window for a 1-based page; pages below 1 are page 1.
    pub fn for_page(page: i64) -> Self {
        let page = page.max(1);
        Self {
            skip: (page - 1).saturating_mul(PAGE_SIZE),
            limit: PAGE_SIZE,
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::for_page(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferQuery {
    pub filter: OfferFilter,
    pub sort: SortOrder,
    pub window: PageWindow,
}

impl OfferQuery {
    pub fn parse(params: &OfferListParams) -> AppResult<Self> {
        let title = non_empty(params.title.as_deref());
        // Postgres text cannot hold NUL.
        if title.is_some_and(|t| t.chars().any(char::is_control)) {
            return Err(AppError::validation("title must not contain control characters"));
        }

        let filter = OfferFilter {
            title: title.map(str::to_string),
            min_price: parse_price_bound("min", params.min.as_deref())?,
            max_price: parse_price_bound("max", params.max.as_deref())?,
        };

        let page = match non_empty(params.page.as_deref()) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::validation("page must be an integer"))?,
            None => 1,
        };

        Ok(Self {
            filter,
            sort: SortOrder::parse(non_empty(params.sort.as_deref())),
            window: PageWindow::for_page(page),
        })
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_price_bound(name: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(AppError::validation(format!("{} must be a number", name))),
    }
}
