// Durable key-value persistence used by the session and cart stores

pub mod log;
pub mod memory;

use anyhow::Result;

/// Key holding the JSON array of registered users
pub const USERS_KEY: &str = "users";
/// Key holding the JSON boolean authentication flag
pub const IS_LOGGED_IN_KEY: &str = "isLoggedIn";
/// Key holding the JSON profile of the signed-in user (or null)
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Key holding the JSON array of cart lines
pub const CART_ITEMS_KEY: &str = "cartItems";

/// String-keyed storage of JSON-serialized values
///
/// Implementations must be safe to share between request handlers.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Read and decode a JSON value, logging and discarding anything unreadable
pub fn read_json<T: serde::de::DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read from storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable stored value");
            None
        }
    }
}

/// Encode and store a JSON value; failures are logged, never returned
pub fn write_json<T: serde::Serialize + ?Sized>(storage: &dyn KeyValueStore, key: &str, value: &T) {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to encode value for storage");
            return;
        }
    };

    if let Err(e) = storage.set(key, encoded) {
        tracing::warn!(key, error = %e, "Failed to write to storage");
    }
}
