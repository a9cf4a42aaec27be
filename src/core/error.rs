// Centralized error handling for the storefront

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Errors from the session store
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Username or email is already registered")]
    DuplicateUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to hash password")]
    PasswordHash,
}

/// Errors from the cart store
#[derive(Error, Debug, PartialEq)]
pub enum CartError {
    #[error("Product has no identifier")]
    MissingIdentifier,
}

/// Errors from the remote products API
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to reach products API: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Products API returned error status: {status}")]
    Server { status: u16 },

    #[error("Failed to parse products API response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Product identifier not provided")]
    MissingIdentifier,
}

impl GatewayError {
    /// Message suitable for showing to the shopper
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => {
                "Could not reach the product catalog. Check your connection or try again later."
            }
            GatewayError::Server { .. } => "The product catalog rejected the request. Try again.",
            GatewayError::Decode(_) => "The product catalog sent an unreadable response.",
            GatewayError::MissingIdentifier => "The product has no identifier.",
        }
    }
}

/// Form validation failures
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Sign in to continue")]
    Unauthorized,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use crate::models::api::ErrorResponse;

        let (status, error_message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Session(SessionError::DuplicateUser) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Session(SessionError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::Session(SessionError::PasswordHash) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::Cart(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Gateway(GatewayError::MissingIdentifier) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Gateway(e) => (StatusCode::BAD_GATEWAY, e.user_message().to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: error_message,
            }),
        )
            .into_response()
    }
}
