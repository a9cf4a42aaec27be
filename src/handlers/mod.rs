pub mod admin;
pub mod auth;
pub mod cart;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod products;
