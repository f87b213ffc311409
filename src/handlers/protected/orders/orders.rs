use std::collections::HashMap;

use axum::extract::{Extension, Path};
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Order, OrderItem, OrderWithItems};

/// Item line joined to its product, still tagged with the order it belongs
/// to so one batched query can serve many orders.
#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i32,
    unit_price: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// GET /api/orders - List the authenticated user's orders with item lines
pub async fn list(
    Extension(pool): Extension<PgPool>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<OrderWithItems>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, total, created_at FROM orders \
         WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.user_id)
    .fetch_all(&pool)
    .await
    .map_err(DatabaseError::from)?;

    // One batched item query for all orders instead of one per order
    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price \
         FROM order_items oi JOIN products p ON p.id = oi.product_id \
         WHERE oi.order_id = ANY($1)",
    )
    .bind(&order_ids)
    .fetch_all(&pool)
    .await
    .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(
        "Orders retrieved",
        group_items(orders, rows),
    ))
}

/// GET /api/orders/:id - Fetch one of the authenticated user's orders
///
/// Orders belonging to other users are indistinguishable from missing ones.
pub async fn get(
    Path(id): Path<i64>,
    Extension(pool): Extension<PgPool>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<OrderWithItems> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, total, created_at FROM orders \
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(auth_user.user_id)
    .fetch_optional(&pool)
    .await
    .map_err(DatabaseError::from)?;

    let order = order.ok_or_else(|| ApiError::not_found("Order not found"))?;
    let items = fetch_items(&pool, order.id).await?;

    Ok(ApiResponse::success(
        "Order retrieved",
        OrderWithItems { order, items },
    ))
}

/// Attach batched item rows to their orders, preserving order ordering.
fn group_items(orders: Vec<Order>, rows: Vec<OrderItemRow>) -> Vec<OrderWithItems> {
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row.into());
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect()
}

async fn fetch_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItem>, ApiError> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price \
         FROM order_items oi JOIN products p ON p.id = oi.product_id \
         WHERE oi.order_id = $1",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::from)?;
    Ok(items)
}
