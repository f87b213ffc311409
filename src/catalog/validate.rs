use std::collections::HashMap;

use super::error::{FieldViolation, ValidationFailure};
use super::types::{ListingFilter, SortColumn, SortDirection};
use crate::config;

/// Parse and validate raw listing query parameters into a `ListingFilter`.
///
/// Every rule is checked independently; all violations come back together in
/// one `ValidationFailure` rather than stopping at the first. Clients rely on
/// getting the complete list for form validation.
pub fn parse_listing_params(
    raw: &HashMap<String, String>,
) -> Result<ListingFilter, ValidationFailure> {
    let params = normalize_keys(raw);
    let catalog = &config::config().catalog;

    let mut violations: Vec<FieldViolation> = Vec::new();

    let category = match lookup(&params, "category") {
        Some(value) => {
            if catalog.categories.iter().any(|c| c == value) {
                Some(value.to_string())
            } else {
                violations.push(FieldViolation::new(
                    "category",
                    format!(
                        "category must be one of: {}",
                        catalog.categories.join(", ")
                    ),
                ));
                None
            }
        }
        None => None,
    };

    let price_min = match lookup(&params, "price_min") {
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n >= 0 => Some(n),
            _ => {
                violations.push(FieldViolation::new(
                    "price_min",
                    "price_min must be a non-negative integer",
                ));
                None
            }
        },
        None => None,
    };

    let price_max = match lookup(&params, "price_max") {
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                violations.push(FieldViolation::new(
                    "price_max",
                    "price_max must be a positive integer",
                ));
                None
            }
        },
        None => None,
    };

    // Cross-field rule, checked only once both bounds parsed cleanly.
    // The violation belongs to the request, not to either field.
    if let (Some(min), Some(max)) = (price_min, price_max) {
        if min >= max {
            violations.push(FieldViolation::request(
                "price_min must be less than price_max",
            ));
        }
    }

    let search = lookup(&params, "search").map(|s| s.to_string());

    let page = match lookup(&params, "page") {
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n > 0 => n,
            _ => {
                violations.push(FieldViolation::new("page", "page must be a positive integer"));
                1
            }
        },
        None => 1,
    };

    let limit = match lookup(&params, "limit") {
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n > 0 && n <= catalog.max_limit => n,
            Ok(n) if n > catalog.max_limit => {
                violations.push(FieldViolation::new(
                    "limit",
                    format!("limit must not exceed {}", catalog.max_limit),
                ));
                catalog.default_limit
            }
            _ => {
                violations.push(FieldViolation::new(
                    "limit",
                    "limit must be a positive integer",
                ));
                catalog.default_limit
            }
        },
        None => catalog.default_limit,
    };

    let sort_by = match lookup(&params, "sort_by") {
        Some(value) => match SortColumn::parse(&value.to_ascii_lowercase()) {
            Some(col) => col,
            None => {
                violations.push(FieldViolation::new(
                    "sort_by",
                    "sort_by must be one of: id, name, original_price, discount_price",
                ));
                SortColumn::Id
            }
        },
        None => SortColumn::Id,
    };

    let order = match lookup(&params, "order") {
        Some(value) => match SortDirection::parse(value) {
            Some(dir) => dir,
            None => {
                violations.push(FieldViolation::new("order", "order must be asc or desc"));
                SortDirection::Desc
            }
        },
        None => SortDirection::Desc,
    };

    if !violations.is_empty() {
        return Err(ValidationFailure::new(violations));
    }

    Ok(ListingFilter {
        category,
        price_min,
        price_max,
        search,
        page,
        limit,
        sort_by,
        order,
    })
}

/// Fold keys to one casing convention so `priceMin`, `price_min` and
/// `PriceMin` all resolve to the same slot.
fn normalize_keys(raw: &HashMap<String, String>) -> HashMap<String, &str> {
    raw.iter()
        .map(|(k, v)| (normalize_key(k), v.as_str()))
        .collect()
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup<'a>(params: &HashMap<String, &'a str>, key: &str) -> Option<&'a str> {
    params
        .get(&normalize_key(key))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_no_params() {
        let filter = parse_listing_params(&raw(&[])).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.sort_by, SortColumn::Id);
        assert_eq!(filter.order, SortDirection::Desc);
        assert!(filter.category.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn accepts_camel_case_keys() {
        let filter =
            parse_listing_params(&raw(&[("priceMin", "100"), ("priceMax", "1000")])).unwrap();
        assert_eq!(filter.price_min, Some(100));
        assert_eq!(filter.price_max, Some(1000));
    }

    #[test]
    fn rejects_unknown_category() {
        let err = parse_listing_params(&raw(&[("category", "InvalidCategory")])).unwrap_err();
        assert!(err.names_field("category"));
    }

    #[test]
    fn accepts_known_category() {
        let filter = parse_listing_params(&raw(&[("category", "Electronics")])).unwrap();
        assert_eq!(filter.category.as_deref(), Some("Electronics"));
    }

    #[test]
    fn limit_boundaries() {
        assert!(parse_listing_params(&raw(&[("limit", "100")])).is_ok());

        let err = parse_listing_params(&raw(&[("limit", "101")])).unwrap_err();
        assert!(err.names_field("limit"));
        assert!(err.joined_messages().contains("exceed"));

        let err = parse_listing_params(&raw(&[("limit", "0")])).unwrap_err();
        assert!(err.joined_messages().contains("positive integer"));
    }

    #[test]
    fn page_zero_fails() {
        let err = parse_listing_params(&raw(&[("page", "0")])).unwrap_err();
        assert!(err.names_field("page"));
    }

    #[test]
    fn price_bounds_cross_field() {
        let err =
            parse_listing_params(&raw(&[("price_min", "1000"), ("price_max", "100")])).unwrap_err();
        // Attached to the request as a whole, not a single field
        assert!(err.violations.iter().any(|v| v.field.is_none()));

        assert!(parse_listing_params(&raw(&[("price_min", "100"), ("price_max", "1000")])).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let err = parse_listing_params(&raw(&[
            ("category", "Nope"),
            ("page", "-1"),
            ("limit", "abc"),
            ("sort_by", "rating"),
            ("order", "sideways"),
        ]))
        .unwrap_err();
        assert_eq!(err.violations.len(), 5);
        assert!(err.names_field("category"));
        assert!(err.names_field("page"));
        assert!(err.names_field("limit"));
        assert!(err.names_field("sort_by"));
        assert!(err.names_field("order"));
    }

    #[test]
    fn order_is_case_insensitive() {
        let filter = parse_listing_params(&raw(&[("order", "ASC")])).unwrap();
        assert_eq!(filter.order, SortDirection::Asc);
        let filter = parse_listing_params(&raw(&[("order", "desc")])).unwrap();
        assert_eq!(filter.order, SortDirection::Desc);
    }

    #[test]
    fn negative_price_min_fails() {
        let err = parse_listing_params(&raw(&[("price_min", "-5")])).unwrap_err();
        assert!(err.names_field("price_min"));
    }
}
