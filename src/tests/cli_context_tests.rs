use std::sync::Arc;

use tempfile::TempDir;

use crate::cli_context::CliContextBuilder;
use crate::config::{load_config_from, save_config_to, Config};
use crate::error::KanbanError;
use crate::models::User;
use crate::store::{Session, SessionStorage};

fn user() -> User {
    User {
        id: 4,
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
    }
}

fn config_with_token(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    let config = Config {
        api_url: Some("http://tracker.test/api".to_string()),
        access_token: Some("stored-token".to_string()),
        user: Some(user()),
        default_project_id: None,
    };
    save_config_to(&config, &path).unwrap();
    path
}

#[test]
fn test_builder_with_token() {
    let mut context = CliContextBuilder::new()
        .with_api_url("http://localhost:9000/api")
        .with_token("test-token")
        .build()
        .unwrap();

    assert!(context.has_token());
    assert_eq!(context.token().unwrap(), "test-token");
    assert_eq!(context.api_url(), "http://localhost:9000/api");

    let client = context.authenticated_client().unwrap();
    let again = context.authenticated_client().unwrap();
    assert!(Arc::ptr_eq(&client, &again));
}

#[test]
fn test_builder_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = config_with_token(&dir);

    let context = CliContextBuilder::new().with_config_path(&path).build().unwrap();

    assert_eq!(context.token().unwrap(), "stored-token");
    assert_eq!(context.api_url(), "http://tracker.test/api");
}

#[test]
fn test_authenticated_client_requires_token() {
    let dir = TempDir::new().unwrap();
    let mut context = CliContextBuilder::new()
        .with_config_path(dir.path().join("missing.json"))
        .build()
        .unwrap();

    assert!(!context.has_token());
    assert!(matches!(context.authenticated_client(), Err(KanbanError::NotAuthenticated)));
    assert!(context.anonymous_client().is_ok());
}

#[test]
fn test_unauthorized_handler_clears_stored_session() {
    let dir = TempDir::new().unwrap();
    let path = config_with_token(&dir);
    let context = CliContextBuilder::new().with_config_path(&path).build().unwrap();

    let handler = context.unauthorized_handler();
    handler();

    let config = load_config_from(&path);
    assert!(config.access_token.is_none());
    assert!(config.user.is_none());
    // unrelated settings survive the logout
    assert_eq!(config.api_url.as_deref(), Some("http://tracker.test/api"));
}

#[test]
fn test_set_session_persists_and_resets_client() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut context = CliContextBuilder::new()
        .with_api_url("http://localhost:9000/api")
        .with_config_path(&path)
        .build()
        .unwrap();

    context
        .set_session(&Session {
            access_token: "fresh".to_string(),
            user: user(),
        })
        .unwrap();

    assert_eq!(context.token().unwrap(), "fresh");
    assert_eq!(context.storage().load().unwrap().user, user());
    assert!(context.authenticated_client().is_ok());

    context.clear_session().unwrap();
    assert!(!context.has_token());
    assert!(context.storage().load().is_none());
}
