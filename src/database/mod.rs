pub mod pool;
pub mod store;

pub use pool::DatabaseError;
pub use store::{PgProductStore, ProductStore};
