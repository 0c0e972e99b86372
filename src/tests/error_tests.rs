use crate::error::{ErrorContext, KanbanError};
use crate::kanban_error;

#[test]
fn test_error_context_on_result() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "file not found",
    ));

    match result.context("Failed to read config file") {
        Err(KanbanError::Unknown(msg)) => {
            assert!(msg.contains("Failed to read config file"));
            assert!(msg.contains("file not found"));
        }
        _ => panic!("Expected KanbanError::Unknown"),
    }
}

#[test]
fn test_error_context_on_option() {
    let option: Option<String> = None;

    match option.context("No default project") {
        Err(KanbanError::Unknown(msg)) => assert_eq!(msg, "No default project"),
        _ => panic!("Expected KanbanError::Unknown"),
    }
}

#[test]
fn test_error_context_with_closure() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "access denied",
    ));

    let kanban_result = result.with_context(|| format!("Failed to write {}", "/tmp/issue.md"));

    match kanban_result {
        Err(KanbanError::Unknown(msg)) => {
            assert!(msg.contains("Failed to write /tmp/issue.md"));
            assert!(msg.contains("access denied"));
        }
        _ => panic!("Expected KanbanError::Unknown"),
    }
}

#[test]
fn test_kanban_error_macro() {
    let error = kanban_error!(Network, "connection refused");
    match error {
        KanbanError::Network(msg) => assert_eq!(msg, "connection refused"),
        _ => panic!("Expected KanbanError::Network"),
    }

    let error = kanban_error!(InvalidInput, "unknown lane: {}", 4);
    match error {
        KanbanError::InvalidInput(msg) => assert_eq!(msg, "unknown lane: 4"),
        _ => panic!("Expected KanbanError::InvalidInput"),
    }
}

#[test]
fn test_user_message_prefers_server_detail() {
    let error = KanbanError::Api {
        status: 400,
        detail: Some("Project name already taken".to_string()),
    };
    assert_eq!(error.user_message("Failed to create project"), "Project name already taken");
}

#[test]
fn test_user_message_falls_back_without_detail() {
    let error = KanbanError::Api {
        status: 500,
        detail: None,
    };
    assert_eq!(error.user_message("Failed to fetch issues"), "Failed to fetch issues");

    let error = KanbanError::Network("timed out".to_string());
    assert_eq!(error.user_message("Failed to update issue status"), "Failed to update issue status");
}

#[test]
fn test_user_message_for_validation() {
    let error = KanbanError::Validation {
        field: "title",
        message: "Title must be at least 3 characters".to_string(),
    };
    assert!(error.is_validation());
    assert_eq!(error.user_message("ignored"), "Title must be at least 3 characters");
}

#[test]
fn test_unauthorized_carries_detail() {
    let error = KanbanError::Unauthorized("Invalid token".to_string());
    assert!(error.is_unauthorized());
    assert_eq!(error.detail(), Some("Invalid token"));
    assert!(error.to_string().contains("kanban auth login"));
}
