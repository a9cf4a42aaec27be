pub mod categories;
pub mod filters;
pub mod products;
