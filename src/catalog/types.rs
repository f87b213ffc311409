use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Columns the listing endpoint may sort by. Closed set: the SQL fragment
/// for ORDER BY is only ever produced by `as_sql`, never taken from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Id,
    Name,
    OriginalPrice,
    DiscountPrice,
}

impl SortColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortColumn::Id => "p.id",
            SortColumn::Name => "p.name",
            SortColumn::OriginalPrice => "p.original_price",
            SortColumn::DiscountPrice => "p.discount_price",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortColumn::Id),
            "name" => Some(SortColumn::Name),
            "original_price" => Some(SortColumn::OriginalPrice),
            "discount_price" => Some(SortColumn::DiscountPrice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// Normalized listing filter, built once per request by the validator and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortColumn,
    pub order: SortDirection,
}

/// A SQL statement paired with its ordered bind parameters.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The data statement and its matching count statement. Both carry the exact
/// same predicate set; the count statement drops ordering and paging.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub data: SqlQuery,
    pub count: SqlQuery,
}
