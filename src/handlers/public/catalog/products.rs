use std::collections::HashMap;

use axum::extract::{Extension, Path, Query};
use sqlx::PgPool;

use crate::catalog::{self, ListingPayload};
use crate::database::{DatabaseError, PgProductStore};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Product;

/// GET /api/products - List products with filtering, sorting and pagination
///
/// Query parameters: category, price_min, price_max, search, page, limit,
/// sort_by, order. Invalid parameters come back as one 400 response that
/// names every violated field.
pub async fn list(
    Query(params): Query<HashMap<String, String>>,
    Extension(store): Extension<PgProductStore>,
) -> ApiResult<ListingPayload> {
    let payload = catalog::list_products(&store, &params).await?;
    Ok(ApiResponse::success("Products retrieved", payload))
}

/// GET /api/products/:id - Fetch a single product with its category name
pub async fn get(
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
) -> ApiResult<Product> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT p.id, p.name, p.original_price, p.discount_price, p.description, \
         c.name AS category_name \
         FROM products p LEFT JOIN categories c ON c.id = p.category_id \
         WHERE p.id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(DatabaseError::from)?;

    match product {
        Some(product) => Ok(ApiResponse::success("Product retrieved", product)),
        None => Err(ApiError::not_found("Product not found")),
    }
}
