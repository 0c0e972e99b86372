pub mod issue;
pub mod project;
pub mod user;

// Re-export commonly used types
pub use issue::{Issue, IssueDraft, IssueId, IssuePriority, IssueStatus, StatusUpdate};
pub use project::{Project, ProjectDraft, ProjectId};
pub use user::{AuthResponse, LoginData, SignupData, User};

use serde::Deserialize;
use serde_json::Value;

/// Error body returned by the API on non-2xx responses.
///
/// `detail` is usually a string, but request-validation failures carry a list
/// of `{ "msg": ... }` objects instead.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        }
    }
}
