pub mod error;
pub mod listing;
pub mod pagination;
pub mod query;
pub mod types;
pub mod validate;

pub use error::{FieldViolation, ListingError, ValidationFailure};
pub use listing::{list_products, ListingPayload};
pub use types::{ListingFilter, SortColumn, SortDirection, SqlQuery};
