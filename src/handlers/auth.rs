use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{LoginRequest, RegisterRequest, RegisterResponse, SessionResponse};
use crate::validation::forms::validate_registration;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

fn session_response(state: &AppState) -> Response {
    (
        StatusCode::OK,
        Json(SessionResponse {
            success: true,
            session: state.session.session(),
        }),
    )
        .into_response()
}

/// Create an account
///
/// POST /auth/register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let form = validate_registration(form)?;

    let user = state
        .session
        .register(&form.username, &form.email, &form.password)?;

    state.metrics.increment_registrations();

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            id: user.id,
            user: user.profile(),
        }),
    )
        .into_response())
}

/// POST /auth/login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    match state.session.login(&credentials.username, &credentials.password) {
        Ok(_) => {
            state.metrics.increment_logins();
            Ok(session_response(&state))
        }
        Err(e) => {
            state.metrics.increment_failed_logins();
            Err(e.into())
        }
    }
}

/// POST /auth/logout
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Response {
    state.session.logout();
    session_response(&state)
}

/// Current authentication state
///
/// GET /auth/session
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Response {
    session_response(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{create_test_state, read_json};
    use crate::models::user::Role;

    fn registration(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "secreto1".to_string(),
            confirm_password: "secreto1".to_string(),
        }
    }

    fn credentials(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let (state, _) = create_test_state();

        let response = register_handler(State(state.clone()), Json(registration("ana", "ana@example.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: RegisterResponse = read_json(response).await;
        assert_eq!(body.id, 2);
        assert_eq!(body.user.role, Role::User);
        assert_eq!(state.metrics.registrations.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let (state, _) = create_test_state();

        let result = register_handler(State(state), Json(registration("testuser", "x@example.com"))).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_invalid_form() {
        let (state, _) = create_test_state();
        let mut form = registration("ana", "ana@example.com");
        form.confirm_password = "otra-cosa".to_string();

        let result = register_handler(State(state.clone()), Json(form)).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.session.users().len(), 1);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let (state, _) = create_test_state();

        let response = login_handler(State(state.clone()), Json(credentials("testuser", "password123")))
            .await
            .unwrap();
        let body: SessionResponse = read_json(response).await;
        assert!(body.session.is_authenticated);
        assert_eq!(body.session.current_user.unwrap().username, "testuser");

        let response = logout_handler(State(state.clone())).await;
        let body: SessionResponse = read_json(response).await;
        assert!(!body.session.is_authenticated);
        assert!(body.session.current_user.is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (state, _) = create_test_state();

        let result = login_handler(State(state.clone()), Json(credentials("testuser", "wrong"))).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: SessionResponse = read_json(session_handler(State(state.clone())).await).await;
        assert!(!body.session.is_authenticated);
        assert_eq!(state.metrics.failed_logins.load(std::sync::atomic::Ordering::Relaxed), 1);
    }
}
