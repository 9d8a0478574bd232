//! Auth service tests against the in-memory user store double.

use motorpool_integration_tests::MemoryUserStore;
use motorpool_server::services::auth::{AuthError, AuthService, Credentials, Registration};

fn registration(username: &str, password: &str, password2: &str) -> Registration {
    Registration {
        username: username.to_owned(),
        password: password.to_owned(),
        password2: password2.to_owned(),
        email: format!("{username}@example.com"),
    }
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    }
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_mismatched_passwords_fails_before_store() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    let result = service
        .register(registration("alice", "password-one", "password-two"))
        .await;

    assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    // The store never saw a call and no record was created
    assert_eq!(store.call_count(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_register_short_password_is_rejected() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    let result = service.register(registration("alice", "short", "short")).await;

    assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username_is_taken() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    service
        .register(registration("alice", "correct horse", "correct horse"))
        .await
        .expect("first registration");

    let result = service
        .register(registration("alice", "battery staple", "battery staple"))
        .await;

    assert!(matches!(result, Err(AuthError::UsernameTaken)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    let mut data = registration("alice", "correct horse", "correct horse");
    data.email = "not-an-email".to_owned();

    assert!(matches!(
        service.register(data).await,
        Err(AuthError::InvalidEmail(_))
    ));
    assert!(store.is_empty());
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_unknown_user_fails() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    let result = service
        .login(credentials("nobody", "whatever password"), "test-agent")
        .await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
}

#[tokio::test]
async fn test_login_wrong_password_leaves_history_unmodified() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    service
        .register(registration("alice", "correct horse", "correct horse"))
        .await
        .expect("register");

    let result = service
        .login(credentials("alice", "wrong horse"), "test-agent")
        .await;
    assert!(matches!(result, Err(AuthError::IncorrectPassword)));

    // A subsequent successful login sees exactly one (its own) entry
    let user = service
        .login(credentials("alice", "correct horse"), "test-agent")
        .await
        .expect("login");
    assert_eq!(user.login_history.len(), 1);
}

#[tokio::test]
async fn test_login_appends_exactly_one_history_entry() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    service
        .register(registration("alice", "correct horse", "correct horse"))
        .await
        .expect("register");

    let first = service
        .login(credentials("alice", "correct horse"), "agent-one")
        .await
        .expect("first login");
    assert_eq!(first.login_history.len(), 1);

    let second = service
        .login(credentials("alice", "correct horse"), "agent-two")
        .await
        .expect("second login");
    assert_eq!(second.login_history.len(), 2);

    let agents: Vec<&str> = second
        .login_history
        .iter()
        .map(|e| e.user_agent.as_str())
        .collect();
    assert_eq!(agents, vec!["agent-one", "agent-two"]);
}

#[tokio::test]
async fn test_login_result_carries_no_password() {
    let store = MemoryUserStore::new();
    let service = AuthService::new(&store);

    service
        .register(registration("alice", "correct horse", "correct horse"))
        .await
        .expect("register");

    let user = service
        .login(credentials("alice", "correct horse"), "test-agent")
        .await
        .expect("login");

    // Serialize the sanitized record and make sure nothing password-shaped
    // survives, whatever the field might be called
    let value = serde_json::to_value(&user).expect("serialize");
    let body = value.to_string();
    assert!(!body.contains("password"));
    assert!(!body.contains("argon2"));

    assert_eq!(user.username.as_str(), "alice");
    assert_eq!(user.email.as_str(), "alice@example.com");
}
