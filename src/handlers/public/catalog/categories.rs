use crate::config;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/categories - The fixed category enumeration
///
/// The set comes from configuration, not from the database, so it matches
/// exactly what the listing validator accepts.
pub async fn list() -> ApiResult<Vec<String>> {
    let categories = config::config().catalog.categories.clone();
    Ok(ApiResponse::success("Categories retrieved", categories))
}
