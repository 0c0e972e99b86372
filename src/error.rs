use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Not logged in. Please run 'kanban auth login' first.")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Session expired ({0}). Please run 'kanban auth login' again.")]
    Unauthorized(String),

    #[error("API request failed ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Issue {0} is not on the board")]
    IssueNotFound(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type KanbanResult<T> = Result<T, KanbanError>;

impl KanbanError {
    /// Server-provided detail message, if the remote side sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            KanbanError::Api { detail, .. } => detail.as_deref(),
            KanbanError::Unauthorized(detail) => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Text for the shared error banner: the remote detail when there is one,
    /// otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            KanbanError::Validation { message, .. } => message.clone(),
            _ => self
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, KanbanError::Unauthorized(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, KanbanError::Validation { .. })
    }
}

pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> KanbanResult<T>;
    fn with_context<F>(self, f: F) -> KanbanResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn context(self, msg: &str) -> KanbanResult<T> {
        self.map_err(|e| KanbanError::Unknown(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> KanbanResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| KanbanError::Unknown(format!("{}: {}", f(), e)))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, msg: &str) -> KanbanResult<T> {
        self.ok_or_else(|| KanbanError::Unknown(msg.to_string()))
    }

    fn with_context<F>(self, f: F) -> KanbanResult<T>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(|| KanbanError::Unknown(f()))
    }
}

#[macro_export]
macro_rules! kanban_error {
    ($error_type:ident, $msg:expr) => {
        $crate::error::KanbanError::$error_type($msg.to_string())
    };
    ($error_type:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::KanbanError::$error_type(format!($fmt, $($arg)*))
    };
}
