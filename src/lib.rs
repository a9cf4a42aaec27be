pub mod api;
pub mod catalog;
pub mod core;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod storage;
pub mod stores;
pub mod utils;
pub mod validation;
