use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, FromRow, PgPool, Row};
use tracing::debug;

use super::pool::DatabaseError;
use crate::catalog::types::SqlQuery;
use crate::config;
use crate::models::Product;

/// Storage executor for the listing endpoint. The orchestrator only sees this
/// trait, so tests run against a fake instead of a live pool.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Run the data statement and map rows to products.
    async fn fetch_products(&self, query: &SqlQuery) -> Result<Vec<Product>, DatabaseError>;

    /// Run the count statement and return the single scalar.
    async fn fetch_count(&self, query: &SqlQuery) -> Result<i64, DatabaseError>;
}

/// Postgres-backed store over the shared connection pool.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn fetch_products(&self, query: &SqlQuery) -> Result<Vec<Product>, DatabaseError> {
        if config::config().database.enable_query_logging {
            debug!(sql = %query.sql, params = query.params.len(), "listing data query");
        }
        let mut q = sqlx::query_as::<_, Product>(&query.sql);
        for p in query.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn fetch_count(&self, query: &SqlQuery) -> Result<i64, DatabaseError> {
        if config::config().database.enable_query_logging {
            debug!(sql = %query.sql, params = query.params.len(), "listing count query");
        }
        let mut q = sqlx::query(&query.sql);
        for p in query.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.clone()), // JSONB fallback
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.clone()),
    }
}
