use std::collections::HashMap;

use serde::Serialize;

use super::error::ListingError;
use super::pagination::{self, Pagination};
use super::{query, validate};
use crate::config;
use crate::database::ProductStore;
use crate::models::Product;

#[derive(Debug, Clone, Serialize)]
pub struct ListingPayload {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Drive one listing request: validate the raw parameters, build the data and
/// count statements, execute both against the store, and shape the payload.
///
/// Validation failures return before any statement is built or executed. The
/// two queries have no ordering dependency and run concurrently; both must
/// finish before the response exists, and a failure in either aborts the
/// request without a partial response.
pub async fn list_products<S>(
    store: &S,
    raw: &HashMap<String, String>,
) -> Result<ListingPayload, ListingError>
where
    S: ProductStore + ?Sized,
{
    let filter = validate::parse_listing_params(raw).map_err(ListingError::Validation)?;
    let queries = query::build(&filter);

    if config::config().catalog.debug_logging {
        tracing::debug!(data = %queries.data.sql, count = %queries.count.sql, "listing statements");
    }

    let (products, total_items) = tokio::try_join!(
        store.fetch_products(&queries.data),
        store.fetch_count(&queries.count),
    )?;

    let pagination = pagination::compute(
        filter.page,
        filter.limit,
        products.len() as i64,
        total_items,
    );

    Ok(ListingPayload {
        products,
        pagination,
    })
}
