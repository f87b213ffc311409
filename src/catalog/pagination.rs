use serde::Serialize;

/// Pagination block of the listing payload. Derived fresh per response from
/// the same query snapshot that produced the rows; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_items: i64,
    pub total_items: i64,
    pub current_page: i64,
    pub items_per_page: i64,
    pub total_pages: i64,
}

/// Saturating so an arbitrarily large `page` still yields a well-formed
/// (empty) response instead of overflowing.
pub fn offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Ceiling division; 0 pages when there are no matching rows.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    if total_items == 0 {
        0
    } else {
        (total_items + limit - 1) / limit
    }
}

pub fn compute(page: i64, limit: i64, current_items: i64, total_items: i64) -> Pagination {
    Pagination {
        current_items,
        total_items,
        current_page: page,
        items_per_page: limit,
        total_pages: total_pages(total_items, limit),
    }
}
