pub mod cart_store;
pub mod session_store;
