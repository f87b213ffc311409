use serde_json::{json, Value};

use super::pagination;
use super::types::{ListingFilter, ListingQuery, SqlQuery};

const SELECT_COLUMNS: &str =
    "p.id, p.name, p.original_price, p.discount_price, p.description, c.name AS category_name";

// Products are always joined with their category so category_name is present
// whether or not a category filter applies.
const FROM_CLAUSE: &str = "FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// Build the data statement and its matching count statement for a validated
/// filter.
///
/// Every user-supplied value is a bind parameter; the only identifiers in the
/// SQL text come from fixed fragments and the `SortColumn` whitelist. The
/// count statement carries the identical predicate set (same join, same
/// filters) so the total is consistent with the returned page.
pub fn build(filter: &ListingFilter) -> ListingQuery {
    let (predicates, params) = build_predicates(filter);

    let where_clause = if predicates.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", predicates.join(" AND "))
    };

    let order_clause = format!(
        "ORDER BY {} {}",
        filter.sort_by.as_sql(),
        filter.order.as_sql()
    );

    // Limit and offset are bound too, numbered after the predicate params.
    let limit_clause = format!("LIMIT ${} OFFSET ${}", params.len() + 1, params.len() + 2);
    let mut data_params = params.clone();
    data_params.push(json!(filter.limit));
    data_params.push(json!(pagination::offset(filter.page, filter.limit)));

    let data_sql = [
        format!("SELECT {}", SELECT_COLUMNS),
        FROM_CLAUSE.to_string(),
        where_clause.clone(),
        order_clause,
        limit_clause,
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let count_sql = ["SELECT COUNT(*) AS count".to_string(), FROM_CLAUSE.to_string(), where_clause]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    ListingQuery {
        data: SqlQuery {
            sql: data_sql,
            params: data_params,
        },
        count: SqlQuery {
            sql: count_sql,
            params,
        },
    }
}

/// One AND-ed predicate per present filter, in a fixed order. Returns the
/// predicate fragments and their bind values; `$n` numbering starts at 1.
fn build_predicates(filter: &ListingFilter) -> (Vec<String>, Vec<Value>) {
    let mut predicates = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(category) = &filter.category {
        params.push(json!(category));
        predicates.push(format!("c.name = ${}", params.len()));
    }
    if let Some(min) = filter.price_min {
        params.push(json!(min));
        predicates.push(format!("p.discount_price >= ${}", params.len()));
    }
    if let Some(max) = filter.price_max {
        params.push(json!(max));
        predicates.push(format!("p.discount_price <= ${}", params.len()));
    }
    if let Some(search) = &filter.search {
        // Wildcards live in the bound value, never in the SQL text
        params.push(json!(format!("%{}%", search)));
        predicates.push(format!("p.name ILIKE ${}", params.len()));
    }

    (predicates, params)
}
