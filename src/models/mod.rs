pub mod api;
pub mod cart;
pub mod product;
pub mod session;
pub mod user;
