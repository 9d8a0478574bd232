//! Authentication route handlers.
//!
//! Login, registration, logout and the login-history page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService, Credentials, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password2: String,
    pub email: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Translate an error code from a redirect into a user-facing message.
fn error_message(code: &str) -> String {
    match code {
        "password_mismatch" => AuthError::PasswordMismatch.to_string(),
        "password_too_short" => "Password must be at least 8 characters".to_owned(),
        "username_taken" => AuthError::UsernameTaken.to_string(),
        "user_not_found" => AuthError::UserNotFound.to_string(),
        "incorrect_password" => AuthError::IncorrectPassword.to_string(),
        "invalid" => "The supplied user name or email is not valid".to_owned(),
        "session" => "Session expired, please try again".to_owned(),
        _ => "Something went wrong, please try again".to_owned(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub username: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// One row of the login-history page, timestamp pre-formatted.
#[derive(Clone)]
pub struct LoginEventView {
    pub when: String,
    pub user_agent: String,
}

fn format_login_time(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Login history page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/history.html")]
pub struct HistoryTemplate {
    pub username: Option<String>,
    pub events: Vec<LoginEventView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        username: None,
        error: query.error.as_deref().map(error_message),
        success: query.success.map(|_| "User created, you can log in now".to_owned()),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let service = AuthService::new(state.users());
    let credentials = Credentials {
        username: form.username,
        password: form.password,
    };

    match service.login(credentials, user_agent).await {
        Ok(user) => {
            let current = CurrentUser {
                username: user.username,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/people").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            let code = match e {
                AuthError::UserNotFound => "user_not_found",
                AuthError::IncorrectPassword => "incorrect_password",
                AuthError::InvalidUsername(_) => "invalid",
                _ => "failed",
            };
            Redirect::to(&format!("/auth/login?error={code}")).into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        username: None,
        error: query.error.as_deref().map(error_message),
        success: query.success.map(|_| "User created".to_owned()),
    }
}

/// Handle registration form submission.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let service = AuthService::new(state.users());
    let registration = Registration {
        username: form.username,
        password: form.password,
        password2: form.password2,
        email: form.email,
    };

    match service.register(registration).await {
        Ok(()) => Redirect::to("/auth/register?success=created").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            let code = match e {
                AuthError::PasswordMismatch => "password_mismatch",
                AuthError::WeakPassword(_) => "password_too_short",
                AuthError::UsernameTaken => "username_taken",
                AuthError::InvalidUsername(_) | AuthError::InvalidEmail(_) => "invalid",
                _ => "failed",
            };
            Redirect::to(&format!("/auth/register?error={code}")).into_response()
        }
    }
}

/// Handle logout: flush the session and return home.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    Redirect::to("/").into_response()
}

/// Display the current user's login history.
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    // Read the history fresh from the store rather than from the session,
    // so logins from other clients show up too.
    let record = state.users().get(&user.username).await?;

    let events = record
        .map(|r| r.login_history)
        .unwrap_or_default()
        .into_iter()
        .rev()
        .map(|event| LoginEventView {
            when: format_login_time(&event.date_time),
            user_agent: event.user_agent,
        })
        .collect();

    Ok(HistoryTemplate {
        username: Some(user.username.into_inner()),
        events,
    }
    .into_response())
}
