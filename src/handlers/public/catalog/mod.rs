pub mod categories;
pub mod products;

pub use categories::list as categories_list;
pub use products::get as products_get;
pub use products::list as products_list;
