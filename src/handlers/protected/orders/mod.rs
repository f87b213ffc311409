pub mod orders;

pub use orders::get as orders_get;
pub use orders::list as orders_list;
