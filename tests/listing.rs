// End-to-end exercise of the listing core: raw query parameters through
// validation, query construction, a fake storage executor, and payload
// shaping. No live database required.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use storefront_api::catalog::types::SqlQuery;
use storefront_api::catalog::{self, ListingError};
use storefront_api::database::{DatabaseError, ProductStore};
use storefront_api::models::Product;

/// Fake storage executor that serves a canned product table, honoring the
/// predicate values and paging parameters it receives.
struct TableStore {
    rows: Vec<Product>,
    queries: Mutex<Vec<SqlQuery>>,
}

impl TableStore {
    fn new(rows: Vec<Product>) -> Self {
        Self {
            rows,
            queries: Mutex::new(vec![]),
        }
    }

    fn seed(count: i64) -> Self {
        let rows = (1..=count)
            .map(|i| Product {
                id: i,
                name: format!("Product {}", i),
                original_price: 1000 + i * 100,
                discount_price: 800 + i * 100,
                description: None,
                category_name: Some(if i % 2 == 0 { "Electronics" } else { "Books" }.to_string()),
            })
            .collect();
        Self::new(rows)
    }

    fn matching(&self, query: &SqlQuery) -> Vec<Product> {
        // Re-apply the bound predicate values against the canned rows. The
        // fake only understands the predicates the builder emits.
        let mut rows: Vec<Product> = self.rows.clone();
        let mut params = query.params.iter();
        if query.sql.contains("c.name =") {
            let want = params.next().and_then(|v| v.as_str()).unwrap().to_string();
            rows.retain(|p| p.category_name.as_deref() == Some(want.as_str()));
        }
        if query.sql.contains("p.discount_price >=") {
            let min = params.next().and_then(|v| v.as_i64()).unwrap();
            rows.retain(|p| p.discount_price >= min);
        }
        if query.sql.contains("p.discount_price <=") {
            let max = params.next().and_then(|v| v.as_i64()).unwrap();
            rows.retain(|p| p.discount_price <= max);
        }
        if query.sql.contains("p.name ILIKE") {
            let pat = params.next().and_then(|v| v.as_str()).unwrap().to_string();
            let needle = pat.trim_matches('%').to_lowercase();
            rows.retain(|p| p.name.to_lowercase().contains(&needle));
        }
        rows
    }
}

#[async_trait]
impl ProductStore for TableStore {
    async fn fetch_products(&self, query: &SqlQuery) -> Result<Vec<Product>, DatabaseError> {
        self.queries.lock().unwrap().push(query.clone());
        let rows = self.matching(query);

        // Last two params are always limit and offset
        let limit = query.params[query.params.len() - 2].as_i64().unwrap() as usize;
        let offset = query.params[query.params.len() - 1].as_i64().unwrap() as usize;
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn fetch_count(&self, query: &SqlQuery) -> Result<i64, DatabaseError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.matching(query).len() as i64)
    }
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn paginates_a_twelve_row_match() -> Result<()> {
    let store = TableStore::seed(12);
    let payload = catalog::list_products(&store, &params(&[("page", "2"), ("limit", "5")])).await?;

    assert_eq!(payload.products.len(), 5);
    assert_eq!(payload.pagination.current_items, 5);
    assert_eq!(payload.pagination.total_items, 12);
    assert_eq!(payload.pagination.current_page, 2);
    assert_eq!(payload.pagination.items_per_page, 5);
    assert_eq!(payload.pagination.total_pages, 3);
    Ok(())
}

#[tokio::test]
async fn category_filter_only_returns_that_category() -> Result<()> {
    let store = TableStore::seed(12);
    let payload =
        catalog::list_products(&store, &params(&[("category", "Electronics")])).await?;

    assert!(!payload.products.is_empty());
    for product in &payload.products {
        assert_eq!(product.category_name.as_deref(), Some("Electronics"));
    }
    assert_eq!(payload.pagination.total_items, 6);
    Ok(())
}

#[tokio::test]
async fn search_matches_substring() -> Result<()> {
    let store = TableStore::seed(12);
    let payload = catalog::list_products(&store, &params(&[("search", "Product 1")])).await?;

    // "Product 1", "Product 10", "Product 11", "Product 12"
    assert_eq!(payload.pagination.total_items, 4);
    for product in &payload.products {
        assert!(product.name.contains("Product 1"));
    }
    Ok(())
}

#[tokio::test]
async fn price_bounds_are_applied() -> Result<()> {
    let store = TableStore::seed(12);
    let payload = catalog::list_products(
        &store,
        &params(&[("price_min", "1000"), ("price_max", "1200")]),
    )
    .await?;

    for product in &payload.products {
        assert!(product.discount_price >= 1000 && product.discount_price <= 1200);
    }
    assert_eq!(payload.pagination.total_items, 3);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_well_formed_not_an_error() -> Result<()> {
    let store = TableStore::seed(3);
    let payload =
        catalog::list_products(&store, &params(&[("page", "9"), ("limit", "10")])).await?;

    assert!(payload.products.is_empty());
    assert_eq!(payload.pagination.current_items, 0);
    assert_eq!(payload.pagination.total_items, 3);
    assert_eq!(payload.pagination.total_pages, 1);
    assert_eq!(payload.pagination.current_page, 9);
    Ok(())
}

#[tokio::test]
async fn invalid_parameters_short_circuit_before_storage() -> Result<()> {
    let store = TableStore::seed(3);
    let err = catalog::list_products(
        &store,
        &params(&[("category", "InvalidCategory"), ("limit", "101")]),
    )
    .await
    .unwrap_err();

    match err {
        ListingError::Validation(failure) => {
            assert!(failure.names_field("category"));
            assert!(failure.names_field("limit"));
            assert_eq!(failure.joined_messages().lines().count(), 2);
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(store.queries.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn payload_serializes_to_wire_shape() -> Result<()> {
    let store = TableStore::seed(2);
    let payload = catalog::list_products(&store, &params(&[])).await?;
    let v = serde_json::to_value(&payload)?;

    assert!(v["products"].is_array());
    let first = &v["products"][0];
    for key in ["id", "name", "originalPrice", "discountPrice", "description", "categoryName"] {
        assert!(first.get(key).is_some(), "missing product key {}", key);
    }
    let pagination = &v["pagination"];
    for key in ["currentItems", "totalItems", "currentPage", "itemsPerPage", "totalPages"] {
        assert!(pagination.get(key).is_some(), "missing pagination key {}", key);
    }
    Ok(())
}
